//! Tree-sitter integration for C# sources.
//!
//! Parses a file into a concrete syntax tree and walks it into the
//! language-neutral [`DeclarationTree`](crate::decl::DeclarationTree). Byte
//! spans come straight from the CST so comments and formatting survive.

pub mod declarations;
pub mod errors;
pub mod parser;

pub use declarations::collect_declarations;
pub use errors::TreeSitterError;
pub use parser::{CSharpParser, ParsedSource};
