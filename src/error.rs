use crate::index::LookupError;
use crate::rule::RuleError;
use crate::ts::TreeSitterError;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while turning one directive into a snippet.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error(transparent)]
    InvalidRule(#[from] RuleError),

    #[error("target not found: {path} (searched {searched} location(s))")]
    TargetNotFound { path: String, searched: usize },

    #[error("member not found: {pattern}{}", did_you_mean(.suggestion))]
    MemberNotFound {
        pattern: String,
        suggestion: Option<String>,
    },

    #[error("no member extractor for language '{language}'; cannot resolve selector '{selector}'")]
    UnsupportedSelector { language: String, selector: String },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: TreeSitterError,
    },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<LookupError> for ExtractError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::NotFound {
                pattern,
                suggestion,
                ..
            } => ExtractError::MemberNotFound {
                pattern,
                suggestion,
            },
        }
    }
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(key) => format!(" (did you mean '{key}'?)"),
        None => String::new(),
    }
}
