//! Codesnip: always-in-sync source excerpts for documentation
//!
//! Documentation code blocks name a source file and a dotted member selector;
//! the build replaces each block with the current text of that member, so
//! snippets cannot drift from the code they describe.
//!
//! # Architecture
//!
//! A source file is parsed with tree-sitter into a language-neutral
//! [`DeclarationTree`], which is flattened into a [`MatchingIndex`]: a trie in
//! which every suffix of a declaration's qualified name is a root-level path.
//! A selector such as `Options.Method` is split into chunks and walked down
//! that trie; the spans on the node it reaches are cut out of the source,
//! optionally reduced to their block structure or their content, and dedented.
//!
//! # Example
//!
//! ```no_run
//! use codesnip::{Build, ExtractorRegistry};
//! use std::path::PathBuf;
//!
//! let mut build = Build::new(ExtractorRegistry::with_defaults(), vec![PathBuf::from("src")]);
//!
//! match build.extract("csharp[Options.cs](2) =Options.Method", None) {
//!     Ok(snippet) => println!("{}", snippet.text),
//!     Err(e) => eprintln!("extraction failed: {}", e),
//! }
//! ```

pub mod build;
pub mod cache;
pub mod config;
pub mod decl;
pub mod document;
pub mod error;
pub mod extract;
pub mod extractor;
pub mod index;
pub mod output;
pub mod pool;
pub mod report;
pub mod resolve;
pub mod rule;
pub mod ts;

// Re-exports
pub use build::Build;
pub use config::{load_from_path, load_from_str, ConfigError, SnipConfig};
pub use decl::{Declaration, DeclarationKind, DeclarationTree, SourceSpan};
pub use document::render;
pub use error::ExtractError;
pub use extract::{dedent, extract_span, extract_spans};
pub use extractor::{
    CSharpExtractor, ExtractorRegistry, PlainTextExtractor, Snippet, SnippetExtractor,
};
pub use index::{qualified_paths, IndexNode, LookupError, MatchingIndex, QualifiedPath};
pub use output::{atomic_write, OutputError};
pub use report::{BuildReport, GenerationError};
pub use rule::{ExtractionMode, ExtractionRule, RuleError};
pub use ts::{CSharpParser, ParsedSource, TreeSitterError};
