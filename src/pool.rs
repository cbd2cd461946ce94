//! Thread-local parser pooling.
//!
//! Creates the C# parser on first use per thread and reuses it for every file
//! indexed on that thread afterwards.

use crate::ts::{CSharpParser, TreeSitterError};
use std::cell::RefCell;

thread_local! {
    static CSHARP_PARSER: RefCell<Option<CSharpParser>> = const { RefCell::new(None) };
}

/// Execute function with pooled parser instance.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use codesnip::pool::with_parser;
///
/// let has_errors = with_parser(|parser| {
///     parser.parse_with_source("class Foo {}").map(|parsed| parsed.has_errors())
/// })??;
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(f: F) -> Result<R, TreeSitterError>
where
    F: FnOnce(&mut CSharpParser) -> R,
{
    CSHARP_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        let parser = match slot.take() {
            Some(parser) => parser,
            None => CSharpParser::new()?,
        };
        Ok(f(slot.insert(parser)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parser_is_reused() {
        let first = with_parser(|parser| parser.parse("class A {}").is_ok()).unwrap();
        let second = with_parser(|parser| parser.parse("class B {}").is_ok()).unwrap();
        assert!(first && second);
        CSHARP_PARSER.with(|cell| assert!(cell.borrow().is_some()));
    }
}
