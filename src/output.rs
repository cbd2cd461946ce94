//! Writing rendered documents back to disk.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("cannot write {path}: path has no parent directory")]
    NoParent { path: PathBuf },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Atomic file write: tempfile + fsync + rename.
///
/// Either the full document lands or the previous file is left as it was.
/// Missing parent directories are created.
pub fn atomic_write(path: &Path, content: &str) -> Result<(), OutputError> {
    let io = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
        Some(parent) => parent,
        None => {
            return Err(OutputError::NoParent {
                path: path.to_path_buf(),
            })
        }
    };
    fs::create_dir_all(parent).map_err(io)?;

    // Same directory keeps the rename on one filesystem
    let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(io)?;
    temp.write_all(content.as_bytes()).map_err(io)?;
    temp.as_file().sync_all().map_err(io)?;
    temp.persist(path).map_err(|e| io(e.error))?;

    Ok(())
}
