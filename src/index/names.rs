//! Key fragments a declaration occupies in the matching index.

use crate::decl::{Declaration, DeclarationKind, DeclarationTree, SourceSpan};

pub const CONSTRUCTOR_KEY: &str = "<Constructor>";
pub const DESTRUCTOR_KEY: &str = "<Destructor>";

/// Fragment levels for `decl`, outermost first.
///
/// Every level carries the declaration's span: a selector may stop at the bare
/// method name (all overloads) or continue into the parameter fragment.
pub fn fragments(decl: &Declaration) -> Vec<String> {
    match decl.kind {
        DeclarationKind::Namespace => decl
            .name
            .split('.')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect(),
        DeclarationKind::Class
        | DeclarationKind::Struct
        | DeclarationKind::Interface
        | DeclarationKind::Record
        | DeclarationKind::Enum => vec![generic_name(&decl.name, &decl.type_parameters)],
        DeclarationKind::EnumMember
        | DeclarationKind::Field
        | DeclarationKind::Property
        | DeclarationKind::Event
        | DeclarationKind::Accessor => vec![decl.name.clone()],
        DeclarationKind::Indexer => vec![parameter_fragment('[', &decl.parameter_types, ']')],
        DeclarationKind::Method => vec![
            generic_name(&decl.name, &decl.type_parameters),
            parameter_fragment('(', &decl.parameter_types, ')'),
        ],
        DeclarationKind::Constructor => vec![CONSTRUCTOR_KEY.to_string()],
        DeclarationKind::Destructor => vec![DESTRUCTOR_KEY.to_string()],
    }
}

/// Fully-qualified selector of one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedPath {
    pub path: String,
    pub kind: DeclarationKind,
    pub span: SourceSpan,
}

/// Every declaration of the tree with its fully-qualified selector, in
/// pre-order.
pub fn qualified_paths(tree: &DeclarationTree) -> Vec<QualifiedPath> {
    let mut out = Vec::new();
    for decl in &tree.declarations {
        collect_paths(decl, "", &mut out);
    }
    out
}

fn collect_paths(decl: &Declaration, prefix: &str, out: &mut Vec<QualifiedPath>) {
    let mut path = prefix.to_string();
    for fragment in fragments(decl) {
        append_fragment(&mut path, &fragment);
    }
    if path.len() > prefix.len() {
        out.push(QualifiedPath {
            path: path.clone(),
            kind: decl.kind,
            span: decl.span,
        });
    }
    for child in &decl.children {
        collect_paths(child, &path, out);
    }
}

/// Parameter fragments attach without a dot: `Run(int)`, `Items[int]`.
pub fn append_fragment(path: &mut String, fragment: &str) {
    let bracketed = fragment.starts_with('(') || fragment.starts_with('[');
    if !path.is_empty() && !bracketed {
        path.push('.');
    }
    path.push_str(fragment);
}

fn generic_name(name: &str, type_parameters: &[String]) -> String {
    if type_parameters.is_empty() {
        name.to_string()
    } else {
        format!("{name}{{{}}}", join_stripped(type_parameters))
    }
}

fn parameter_fragment(open: char, types: &[String], close: char) -> String {
    format!("{open}{}{close}", join_stripped(types))
}

fn join_stripped(items: &[String]) -> String {
    items
        .iter()
        .map(|item| strip_whitespace(item))
        .collect::<Vec<_>>()
        .join(",")
}

pub(crate) fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
