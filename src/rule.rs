//! Extraction directives.
//!
//! Grammar: `<language>? [ <path> ] ( <highlight-lines> )? <selector>?`
//!
//! ```text
//! csharp[Foo.cs] Bar.Baz(string,int)
//! csharp[Foo.cs](3,5) =Bar.Baz
//! csharp[Foo.cs] -Bar.Baz
//! ```

use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("invalid extraction rule: {expression}")]
    InvalidRule { expression: String },
}

/// How much of a matched declaration is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionMode {
    /// The whole declaration
    #[default]
    FullMember,
    /// Signature plus a `// ...` stub body (`=` prefix)
    BlockStructureOnly,
    /// Only the lines inside the outer braces (`-` prefix)
    ContentOnly,
}

/// A parsed directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRule {
    language: String,
    path: String,
    highlight_lines: BTreeSet<u32>,
    selector: String,
    selector_offset: usize,
}

impl ExtractionRule {
    /// Parse a directive. A missing or empty `[path]` is the only hard failure;
    /// malformed highlight lists degrade silently.
    pub fn parse(expression: &str) -> Result<Self, RuleError> {
        let invalid = || RuleError::InvalidRule {
            expression: expression.to_string(),
        };

        let open = expression.find('[').ok_or_else(invalid)?;
        let close = expression[open + 1..]
            .find(']')
            .map(|i| open + 1 + i)
            .ok_or_else(invalid)?;

        let language = expression[..open].trim().to_string();
        let path = expression[open + 1..close].trim().to_string();
        if path.is_empty() {
            return Err(invalid());
        }

        let mut rest_start = close + 1;
        let mut highlight_lines = BTreeSet::new();
        if expression[rest_start..].starts_with('(') {
            if let Some(end) = expression[rest_start..].find(')') {
                let list = &expression[rest_start + 1..rest_start + end];
                highlight_lines = parse_line_list(list);
                rest_start += end + 1;
            }
        }

        let rest = &expression[rest_start..];
        let leading = rest.len() - rest.trim_start().len();
        let selector = rest.trim().to_string();
        let selector_offset = if selector.is_empty() {
            expression.len()
        } else {
            rest_start + leading
        };

        Ok(Self {
            language,
            path,
            highlight_lines,
            selector,
            selector_offset,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn highlight_lines(&self) -> &BTreeSet<u32> {
        &self.highlight_lines
    }

    /// The raw selector including any mode marker.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Byte offset of the selector within the original expression.
    pub fn selector_offset(&self) -> usize {
        self.selector_offset
    }

    pub fn mode(&self) -> ExtractionMode {
        match self.selector.chars().next() {
            Some('=') => ExtractionMode::BlockStructureOnly,
            Some('-') => ExtractionMode::ContentOnly,
            _ => ExtractionMode::FullMember,
        }
    }

    /// The selector without its mode marker; empty means the whole file.
    pub fn member_pattern(&self) -> &str {
        match self.mode() {
            ExtractionMode::FullMember => &self.selector,
            _ => self.selector[1..].trim(),
        }
    }
}

fn parse_line_list(list: &str) -> BTreeSet<u32> {
    list.split(',')
        .filter_map(|token| token.trim().parse::<u32>().ok())
        .collect()
}
