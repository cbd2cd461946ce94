use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeSitterError {
    #[error("failed to load the C# grammar into the parser")]
    LanguageSet,

    #[error("tree-sitter produced no tree for the source")]
    ParseFailed,

    #[error("syntax error at line {line}, column {column} (bytes {byte_start}..{byte_end})")]
    SyntaxError {
        byte_start: usize,
        byte_end: usize,
        line: usize,
        column: usize,
    },
}
