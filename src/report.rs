//! Build-wide error report.
//!
//! Failures are recorded per fenced block and never abort the build; the
//! report is inspected once all documents are rendered.

use std::fmt;
use std::path::PathBuf;

/// One failed directive, located in its document (1-based line and column).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationError {
    pub source_file: PathBuf,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.source_file.display(),
            self.line,
            self.column,
            self.message
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    errors: Vec<GenerationError>,
}

impl BuildReport {
    pub fn push(&mut self, error: GenerationError) {
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[GenerationError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }
}
