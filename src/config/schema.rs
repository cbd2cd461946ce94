use crate::extractor::ExtractorRegistry;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "codesnip.toml";

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct SnipConfig {
    #[serde(default)]
    pub sources: Sources,
    /// Extra language tags routed to registered extractors: `cs = "csharp"`
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Sources {
    /// Candidate roots searched in order for directive targets
    #[serde(default)]
    pub roots: Vec<String>,
}

impl SnipConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        for (idx, root) in self.sources.roots.iter().enumerate() {
            if root.trim().is_empty() {
                issues.push(ValidationIssue::BlankRoot { index: idx });
            }
        }

        let registry = ExtractorRegistry::with_defaults();
        for (tag, target) in &self.languages {
            if tag.trim().is_empty() {
                issues.push(ValidationIssue::BlankLanguageTag {
                    target: target.clone(),
                });
            }
            if registry.resolve(target).is_none() {
                issues.push(ValidationIssue::UnknownExtractor {
                    tag: tag.clone(),
                    target: target.clone(),
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Source roots resolved against the directory holding the config file.
    pub fn source_roots(&self, base_dir: &Path) -> Vec<PathBuf> {
        self.sources
            .roots
            .iter()
            .map(|root| base_dir.join(root.trim()))
            .collect()
    }

    /// Default registry extended with the configured language tags.
    pub fn registry(&self) -> ExtractorRegistry {
        let mut registry = ExtractorRegistry::with_defaults();
        for (tag, target) in &self.languages {
            // validate() has already rejected unknown targets
            if let Some(name) = registry.resolve(target) {
                registry.insert_alias(tag, name);
            }
        }
        registry
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    BlankRoot { index: usize },
    BlankLanguageTag { target: String },
    UnknownExtractor { tag: String, target: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::BlankRoot { index } => {
                write!(f, "sources.roots[{index}] is blank")
            }
            ValidationIssue::BlankLanguageTag { target } => {
                write!(f, "blank language tag mapped to '{target}'")
            }
            ValidationIssue::UnknownExtractor { tag, target } => {
                write!(f, "language '{tag}' maps to unknown extractor '{target}'")
            }
        }
    }
}
