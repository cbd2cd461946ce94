//! Language-neutral declaration tree.
//!
//! A language walker (see [`crate::ts::declarations`]) turns a concrete syntax tree
//! into these nodes; the matching index consumes them without knowing which
//! grammar produced them.

use std::fmt;

/// Byte range of a declaration in its source file.
///
/// Text is sliced on demand; spans never own source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceSpan {
    /// Starting byte offset (inclusive)
    pub byte_start: usize,
    /// Ending byte offset (exclusive)
    pub byte_end: usize,
}

impl SourceSpan {
    pub fn new(byte_start: usize, byte_end: usize) -> Self {
        Self {
            byte_start,
            byte_end,
        }
    }

    pub fn len(&self) -> usize {
        self.byte_end.saturating_sub(self.byte_start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Kind of a declaration, as far as addressing cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Namespace,
    Class,
    Struct,
    Interface,
    Record,
    Enum,
    EnumMember,
    Field,
    Property,
    Accessor,
    Indexer,
    Event,
    Method,
    Constructor,
    Destructor,
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeclarationKind::Namespace => "namespace",
            DeclarationKind::Class => "class",
            DeclarationKind::Struct => "struct",
            DeclarationKind::Interface => "interface",
            DeclarationKind::Record => "record",
            DeclarationKind::Enum => "enum",
            DeclarationKind::EnumMember => "enum member",
            DeclarationKind::Field => "field",
            DeclarationKind::Property => "property",
            DeclarationKind::Accessor => "accessor",
            DeclarationKind::Indexer => "indexer",
            DeclarationKind::Event => "event",
            DeclarationKind::Method => "method",
            DeclarationKind::Constructor => "constructor",
            DeclarationKind::Destructor => "destructor",
        };
        f.write_str(name)
    }
}

/// One named source construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    /// Declared name; accessors carry their keyword, indexers and
    /// constructors carry an empty name.
    pub name: String,
    pub type_parameters: Vec<String>,
    /// Parameter types in declaration order (methods and indexers only)
    pub parameter_types: Vec<String>,
    pub span: SourceSpan,
    pub children: Vec<Declaration>,
}

impl Declaration {
    pub fn new(kind: DeclarationKind, name: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            kind,
            name: name.into(),
            type_parameters: Vec::new(),
            parameter_types: Vec::new(),
            span,
            children: Vec::new(),
        }
    }

    pub fn with_type_parameters<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_parameters = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parameter_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameter_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_children(mut self, children: Vec<Declaration>) -> Self {
        self.children = children;
        self
    }
}

/// All top-level declarations of one file plus the span of the whole file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationTree {
    pub span: SourceSpan,
    pub declarations: Vec<Declaration>,
}

impl DeclarationTree {
    pub fn new(source_len: usize, declarations: Vec<Declaration>) -> Self {
        Self {
            span: SourceSpan::new(0, source_len),
            declarations,
        }
    }

    /// Depth-first, pre-order iteration over every declaration.
    pub fn walk(&self) -> impl Iterator<Item = &Declaration> {
        let mut stack: Vec<&Declaration> = self.declarations.iter().rev().collect();
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children.iter().rev());
            Some(next)
        })
    }
}
