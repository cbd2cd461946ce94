//! A documentation build session.
//!
//! One `Build` lives for one run over a set of documents. It owns an extractor
//! per language (and therefore one index cache per language), the ordered
//! source roots, and the report of every failed directive. Dropping the session
//! discards all cached indexes.

use crate::error::ExtractError;
use crate::extractor::{ExtractorRegistry, PlainTextExtractor, Snippet, SnippetExtractor};
use crate::report::{BuildReport, GenerationError};
use crate::resolve::resolve_target;
use crate::rule::ExtractionRule;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

pub struct Build {
    registry: ExtractorRegistry,
    roots: Vec<PathBuf>,
    extractors: HashMap<&'static str, Box<dyn SnippetExtractor>>,
    report: BuildReport,
}

impl Build {
    pub fn new(registry: ExtractorRegistry, roots: Vec<PathBuf>) -> Self {
        Self {
            registry,
            roots,
            extractors: HashMap::new(),
            report: BuildReport::default(),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Parse a directive and extract its snippet.
    pub fn extract(&mut self, expression: &str, document_dir: Option<&Path>) -> Result<Snippet, ExtractError> {
        let rule = ExtractionRule::parse(expression)?;
        self.extract_rule(&rule, document_dir)
    }

    /// Extract the snippet for an already parsed rule.
    pub fn extract_rule(
        &mut self,
        rule: &ExtractionRule,
        document_dir: Option<&Path>,
    ) -> Result<Snippet, ExtractError> {
        let path = resolve_target(rule.path(), document_dir, &self.roots)?;

        let text = match self.registry.resolve(rule.language()) {
            Some(name) => {
                let extractor = match self.extractors.entry(name) {
                    Entry::Occupied(entry) => entry.into_mut(),
                    Entry::Vacant(entry) => {
                        let created = self.registry.create(name).ok_or_else(|| {
                            ExtractError::UnsupportedSelector {
                                language: rule.language().to_string(),
                                selector: rule.selector().to_string(),
                            }
                        })?;
                        entry.insert(created)
                    }
                };
                extractor.extract(&path, rule)?
            }
            None => PlainTextExtractor::new(rule.language()).extract(&path, rule)?,
        };

        Ok(Snippet {
            text,
            language_hint: rule.language().to_string(),
            highlight_lines: rule.highlight_lines().clone(),
        })
    }

    /// Record a per-block failure; the build carries on.
    pub fn record(&mut self, error: GenerationError) {
        warn!(
            file = %error.source_file.display(),
            line = error.line,
            column = error.column,
            "{}",
            error.message
        );
        self.report.push(error);
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    pub fn into_report(self) -> BuildReport {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn workspace() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Foo.cs"),
            "class Foo\n{\n    int Count;\n}\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "\nplain notes\n").unwrap();
        dir
    }

    #[test]
    fn extracts_members_and_whole_files() {
        let dir = workspace();
        let mut build = Build::new(ExtractorRegistry::with_defaults(), vec![dir.path().to_path_buf()]);

        let snippet = build.extract("cs[Foo.cs](1) Foo.Count", None).unwrap();
        assert_eq!(snippet.text, "int Count;");
        assert_eq!(snippet.language_hint, "cs");
        assert!(snippet.highlight_lines.contains(&1));

        let notes = build.extract("text[notes.txt]", None).unwrap();
        assert_eq!(notes.text, "plain notes");
    }

    #[test]
    fn errors_are_typed() {
        let dir = workspace();
        let mut build = Build::new(ExtractorRegistry::with_defaults(), vec![dir.path().to_path_buf()]);

        assert!(matches!(
            build.extract("csharp Foo.cs", None),
            Err(ExtractError::InvalidRule(_))
        ));
        assert!(matches!(
            build.extract("csharp[Bar.cs] Bar", None),
            Err(ExtractError::TargetNotFound { .. })
        ));
        assert!(matches!(
            build.extract("csharp[Foo.cs] Foo.Missing", None),
            Err(ExtractError::MemberNotFound { .. })
        ));
        assert!(matches!(
            build.extract("text[notes.txt] Something", None),
            Err(ExtractError::UnsupportedSelector { .. })
        ));
    }

    #[test]
    fn record_keeps_going() {
        let mut build = Build::new(ExtractorRegistry::with_defaults(), Vec::new());
        build.record(GenerationError {
            source_file: PathBuf::from("a.md"),
            message: "boom".to_string(),
            line: 1,
            column: 1,
        });
        assert_eq!(build.report().len(), 1);
        assert_eq!(build.into_report().errors()[0].message, "boom");
    }
}
