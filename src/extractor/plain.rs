//! Whole-file inclusion for languages without a declaration walker.

use super::SnippetExtractor;
use crate::decl::SourceSpan;
use crate::error::ExtractError;
use crate::extract::extract_span;
use crate::rule::ExtractionRule;
use std::fs;
use std::path::Path;

/// Includes entire files; any member selector is rejected.
#[derive(Debug, Clone)]
pub struct PlainTextExtractor {
    language: String,
}

impl PlainTextExtractor {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }
}

impl SnippetExtractor for PlainTextExtractor {
    fn language(&self) -> &'static str {
        "text"
    }

    fn extract(&mut self, path: &Path, rule: &ExtractionRule) -> Result<String, ExtractError> {
        if !rule.member_pattern().is_empty() {
            return Err(ExtractError::UnsupportedSelector {
                language: self.language.clone(),
                selector: rule.selector().to_string(),
            });
        }

        let source = fs::read_to_string(path).map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(extract_span(
            &source,
            SourceSpan::new(0, source.len()),
            rule.mode(),
        ))
    }
}
