use crate::error::ExtractError;
use std::path::{Path, PathBuf};

/// Locate a directive's target file.
///
/// Absolute paths are used as-is. Relative paths are tried against the
/// containing document's directory first, then each source root in order; the
/// first existing file wins. The result is canonical so it can key the cache.
pub fn resolve_target(
    target: &str,
    document_dir: Option<&Path>,
    roots: &[PathBuf],
) -> Result<PathBuf, ExtractError> {
    let relative = Path::new(target);
    let candidates: Vec<PathBuf> = if relative.is_absolute() {
        vec![relative.to_path_buf()]
    } else {
        document_dir
            .into_iter()
            .chain(roots.iter().map(PathBuf::as_path))
            .map(|base| base.join(relative))
            .collect()
    };

    candidates
        .iter()
        .find(|candidate| candidate.is_file())
        .map(|found| found.canonicalize().unwrap_or_else(|_| found.clone()))
        .ok_or_else(|| ExtractError::TargetNotFound {
            path: target.to_string(),
            searched: candidates.len(),
        })
}
