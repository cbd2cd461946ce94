//! Per-build memo of indexed source files.
//!
//! Parsing and index construction are the expensive steps, so each resolved
//! file is indexed once per build. Entries are immutable once inserted and are
//! handed out as `Arc`s; dropping the cache (end of build) releases them.

use crate::error::ExtractError;
use crate::index::MatchingIndex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Source text of one file together with its matching index.
#[derive(Debug)]
pub struct IndexedSource {
    pub path: PathBuf,
    pub source: String,
    pub index: MatchingIndex,
}

/// Build-scoped cache keyed by absolute file path.
#[derive(Debug, Default)]
pub struct IndexCache {
    entries: HashMap<PathBuf, Arc<IndexedSource>>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an indexed file from cache, or build and cache it.
    ///
    /// A failed build is not cached; the next reference retries.
    pub fn get_or_build<F>(&mut self, path: &Path, build: F) -> Result<Arc<IndexedSource>, ExtractError>
    where
        F: FnOnce(&Path) -> Result<IndexedSource, ExtractError>,
    {
        if let Some(entry) = self.entries.get(path) {
            debug!(path = %path.display(), "index cache hit");
            return Ok(Arc::clone(entry));
        }

        let built = Arc::new(build(path)?);
        self.entries.insert(path.to_path_buf(), Arc::clone(&built));
        Ok(built)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every entry (start of a new build).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
