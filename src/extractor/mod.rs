//! Language-tagged snippet extractors.
//!
//! Each language with a declaration walker provides a [`SnippetExtractor`].
//! The [`ExtractorRegistry`] maps directive language tags to factories so a
//! build can create one extractor (and one index cache) per language.

pub mod csharp;
pub mod plain;

pub use csharp::CSharpExtractor;
pub use plain::PlainTextExtractor;

use crate::error::ExtractError;
use crate::rule::ExtractionRule;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Extracted text ready to be placed in a fenced block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub text: String,
    pub language_hint: String,
    pub highlight_lines: BTreeSet<u32>,
}

/// Resolves a rule's member selector against one file.
pub trait SnippetExtractor {
    /// Canonical language name this extractor was registered under.
    fn language(&self) -> &'static str;

    /// Extract the text addressed by `rule` from the file at `path`.
    fn extract(&mut self, path: &Path, rule: &ExtractionRule) -> Result<String, ExtractError>;
}

pub type ExtractorFactory = fn() -> Box<dyn SnippetExtractor>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    UnknownExtractor { tag: String, target: String },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::UnknownExtractor { tag, target } => write!(
                f,
                "language tag '{tag}' points at unknown extractor '{target}'"
            ),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Static mapping from language tags to extractor factories.
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    factories: BTreeMap<&'static str, ExtractorFactory>,
    aliases: BTreeMap<String, &'static str>,
}

impl ExtractorRegistry {
    /// Registry with every built-in extractor and its common tags.
    pub fn with_defaults() -> Self {
        let mut registry = Self::default();
        registry.register(csharp::LANGUAGE, csharp::factory);
        for tag in ["cs", "c#"] {
            registry.insert_alias(tag, csharp::LANGUAGE);
        }
        registry
    }

    pub fn register(&mut self, name: &'static str, factory: ExtractorFactory) {
        self.factories.insert(name, factory);
    }

    /// Route `tag` to the extractor registered as `target`.
    pub fn alias(&mut self, tag: &str, target: &str) -> Result<(), RegistryError> {
        let Some((&name, _)) = self.factories.get_key_value(target.to_lowercase().as_str()) else {
            return Err(RegistryError::UnknownExtractor {
                tag: tag.to_string(),
                target: target.to_string(),
            });
        };
        self.insert_alias(tag, name);
        Ok(())
    }

    /// Route `tag` to `name`, which must already be a registered extractor.
    pub(crate) fn insert_alias(&mut self, tag: &str, name: &'static str) {
        self.aliases.insert(tag.trim().to_lowercase(), name);
    }

    /// Canonical extractor name for a directive language tag.
    pub fn resolve(&self, tag: &str) -> Option<&'static str> {
        let tag = tag.trim().to_lowercase();
        if let Some((name, _)) = self.factories.get_key_value(tag.as_str()) {
            return Some(*name);
        }
        self.aliases.get(&tag).copied()
    }

    pub fn create(&self, name: &str) -> Option<Box<dyn SnippetExtractor>> {
        self.factories.get(name).map(|factory| factory())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("extractors", &self.factories.keys().collect::<Vec<_>>())
            .field("aliases", &self.aliases)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tags_resolve_to_csharp() {
        let registry = ExtractorRegistry::with_defaults();
        for tag in ["csharp", "CSharp", "cs", "c#", " cs "] {
            assert_eq!(registry.resolve(tag), Some("csharp"), "tag {tag}");
        }
        assert_eq!(registry.resolve("xml"), None);
        assert_eq!(registry.resolve(""), None);
    }

    #[test]
    fn aliases_must_target_registered_extractors() {
        let mut registry = ExtractorRegistry::with_defaults();
        registry.alias("dotnet", "csharp").unwrap();
        assert_eq!(registry.resolve("dotnet"), Some("csharp"));

        let err = registry.alias("py", "python").unwrap_err();
        assert_eq!(
            err.to_string(),
            "language tag 'py' points at unknown extractor 'python'"
        );
    }

    #[test]
    fn create_builds_fresh_extractors() {
        let registry = ExtractorRegistry::with_defaults();
        let extractor = registry.create("csharp").unwrap();
        assert_eq!(extractor.language(), "csharp");
        assert!(registry.create("cs").is_none());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["csharp"]);
    }

    #[test]
    fn aliases_are_normalized() {
        let mut registry = ExtractorRegistry::default();
        registry.register(csharp::LANGUAGE, csharp::factory);
        registry.insert_alias(" DotNet ", csharp::LANGUAGE);
        assert_eq!(registry.resolve("dotnet"), Some("csharp"));
        assert!(registry.create("csharp").is_some());
    }
}
