//! C# member extraction backed by the matching index.

use super::SnippetExtractor;
use crate::cache::{IndexCache, IndexedSource};
use crate::decl::DeclarationTree;
use crate::error::ExtractError;
use crate::extract::extract_spans;
use crate::index::MatchingIndex;
use crate::pool::with_parser;
use crate::rule::ExtractionRule;
use crate::ts::{collect_declarations, TreeSitterError};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub const LANGUAGE: &str = "csharp";

pub fn factory() -> Box<dyn SnippetExtractor> {
    Box::new(CSharpExtractor::new())
}

/// Extractor for C# sources; owns the index cache of one build.
#[derive(Debug, Default)]
pub struct CSharpExtractor {
    cache: IndexCache,
}

impl CSharpExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &IndexCache {
        &self.cache
    }
}

impl SnippetExtractor for CSharpExtractor {
    fn language(&self) -> &'static str {
        LANGUAGE
    }

    fn extract(&mut self, path: &Path, rule: &ExtractionRule) -> Result<String, ExtractError> {
        let indexed = self.cache.get_or_build(path, load_source)?;
        let node = indexed.index.find(rule.member_pattern())?;
        Ok(extract_spans(&indexed.source, node.spans(), rule.mode()))
    }
}

/// Read and index one C# file.
pub fn load_source(path: &Path) -> Result<IndexedSource, ExtractError> {
    let source = fs::read_to_string(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (_, index) = index_source(&source).map_err(|source| ExtractError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), bytes = source.len(), "indexed C# source");
    Ok(IndexedSource {
        path: path.to_path_buf(),
        source,
        index,
    })
}

/// Parse C# text into its declaration tree and matching index.
///
/// Syntax errors are tolerated: tree-sitter recovers, and declarations outside
/// the damaged region stay addressable.
pub fn index_source(source: &str) -> Result<(DeclarationTree, MatchingIndex), TreeSitterError> {
    let tree = with_parser(|parser| -> Result<DeclarationTree, TreeSitterError> {
        let parsed = parser.parse_with_source(source)?;
        let errors = parsed.error_nodes();
        if let Some(first) = errors.first() {
            warn!(
                errors = errors.len(),
                first = %TreeSitterError::from(first),
                "C# source has syntax errors; continuing with recovered tree"
            );
        }
        Ok(collect_declarations(&parsed))
    })??;

    let index = MatchingIndex::build(&tree);
    Ok((tree, index))
}
