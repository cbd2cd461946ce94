//! C# declaration walker.
//!
//! Turns a tree-sitter C# tree into a [`DeclarationTree`]. Only constructs that
//! can be addressed by a selector become declarations; method bodies are never
//! descended into.

use crate::decl::{Declaration, DeclarationKind, DeclarationTree, SourceSpan};
use crate::index::names::strip_whitespace;
use crate::ts::parser::ParsedSource;
use tree_sitter::Node;

const ACCESSOR_KEYWORDS: &[&str] = &["get", "set", "init", "add", "remove"];

/// Collect the declaration tree of a parsed C# file.
pub fn collect_declarations(parsed: &ParsedSource<'_>) -> DeclarationTree {
    let root = parsed.root_node();
    let source = parsed.source;
    let declarations = collect_members(root, source);
    DeclarationTree::new(source.len(), declarations)
}

fn collect_members(container: Node<'_>, source: &str) -> Vec<Declaration> {
    let mut members = Vec::new();
    let mut cursor = container.walk();
    let children: Vec<Node<'_>> = container.named_children(&mut cursor).collect();

    let mut i = 0;
    while i < children.len() {
        let child = children[i];
        if child.kind() == "file_scoped_namespace_declaration" {
            // Older grammars leave the members of a file-scoped namespace as
            // siblings that follow it.
            let mut decl = namespace(child, source);
            // The namespace governs the rest of the file
            decl.span = SourceSpan::new(decl.span.byte_start, source.len());
            if decl.children.is_empty() {
                let rest = &children[i + 1..];
                decl.children = rest
                    .iter()
                    .flat_map(|sibling| member_declarations(*sibling, source))
                    .collect();
                members.push(decl);
                break;
            }
            members.push(decl);
        } else {
            members.extend(member_declarations(child, source));
        }
        i += 1;
    }

    members
}

fn member_declarations(node: Node<'_>, source: &str) -> Vec<Declaration> {
    match node.kind() {
        "namespace_declaration" | "file_scoped_namespace_declaration" => {
            vec![namespace(node, source)]
        }
        "class_declaration" => type_declaration(node, source, DeclarationKind::Class),
        "struct_declaration" => type_declaration(node, source, DeclarationKind::Struct),
        "interface_declaration" => type_declaration(node, source, DeclarationKind::Interface),
        "record_declaration" | "record_struct_declaration" => {
            type_declaration(node, source, DeclarationKind::Record)
        }
        "enum_declaration" => type_declaration(node, source, DeclarationKind::Enum),
        "enum_member_declaration" => named(node, source, DeclarationKind::EnumMember)
            .into_iter()
            .collect(),
        "field_declaration" => declarators(node, source, DeclarationKind::Field),
        "event_field_declaration" => declarators(node, source, DeclarationKind::Event),
        "property_declaration" => with_accessors(node, source, DeclarationKind::Property),
        "event_declaration" => with_accessors(node, source, DeclarationKind::Event),
        "indexer_declaration" => vec![indexer(node, source)],
        "accessor_declaration" => accessor(node, source).into_iter().collect(),
        "method_declaration" => method(node, source).into_iter().collect(),
        "constructor_declaration" => vec![Declaration::new(
            DeclarationKind::Constructor,
            "",
            span_of(node),
        )],
        "destructor_declaration" => vec![Declaration::new(
            DeclarationKind::Destructor,
            "",
            span_of(node),
        )],
        // Wrappers that may hold members: bodies and preprocessor regions
        kind if is_member_container(kind) => collect_members(node, source),
        _ => Vec::new(),
    }
}

fn is_member_container(kind: &str) -> bool {
    matches!(
        kind,
        "declaration_list" | "enum_member_declaration_list" | "accessor_list"
    ) || kind.starts_with("preproc_")
}

fn namespace(node: Node<'_>, source: &str) -> Declaration {
    let name = node
        .child_by_field_name("name")
        .map(|n| strip_whitespace(text(n, source)))
        .unwrap_or_default();

    let children = match node.child_by_field_name("body") {
        Some(body) => collect_members(body, source),
        None => collect_members(node, source),
    };

    Declaration::new(DeclarationKind::Namespace, name, span_of(node)).with_children(children)
}

fn type_declaration(node: Node<'_>, source: &str, kind: DeclarationKind) -> Vec<Declaration> {
    let Some(name) = name_of(node, source) else {
        return Vec::new();
    };

    let children = body_of(node)
        .map(|body| collect_members(body, source))
        .unwrap_or_default();

    vec![Declaration::new(kind, name, span_of(node))
        .with_type_parameters(type_parameters(node, source))
        .with_children(children)]
}

fn named(node: Node<'_>, source: &str, kind: DeclarationKind) -> Option<Declaration> {
    let name = name_of(node, source)?;
    Some(Declaration::new(kind, name, span_of(node)))
}

/// One declaration per declarator; each keeps the span of the whole statement.
fn declarators(node: Node<'_>, source: &str, kind: DeclarationKind) -> Vec<Declaration> {
    let Some(variables) = child_of_kind(node, "variable_declaration") else {
        return Vec::new();
    };

    let mut cursor = variables.walk();
    variables
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "variable_declarator")
        .filter_map(|declarator| name_of(declarator, source))
        .map(|name| Declaration::new(kind, name, span_of(node)))
        .collect()
}

fn with_accessors(node: Node<'_>, source: &str, kind: DeclarationKind) -> Vec<Declaration> {
    let Some(name) = name_of(node, source) else {
        return Vec::new();
    };
    vec![Declaration::new(kind, name, span_of(node)).with_children(accessors(node, source))]
}

fn accessors(node: Node<'_>, source: &str) -> Vec<Declaration> {
    node.child_by_field_name("accessors")
        .or_else(|| child_of_kind(node, "accessor_list"))
        .map(|list| collect_members(list, source))
        .unwrap_or_default()
}

fn accessor(node: Node<'_>, source: &str) -> Option<Declaration> {
    let keyword = match node.child_by_field_name("name") {
        Some(name) => text(name, source).trim().to_string(),
        None => {
            let mut cursor = node.walk();
            let found = node
                .children(&mut cursor)
                .find(|child| ACCESSOR_KEYWORDS.contains(&child.kind()))
                .map(|child| child.kind().to_string());
            found?
        }
    };
    Some(Declaration::new(DeclarationKind::Accessor, keyword, span_of(node)))
}

fn indexer(node: Node<'_>, source: &str) -> Declaration {
    let parameters = node
        .child_by_field_name("parameters")
        .or_else(|| child_of_kind(node, "bracketed_parameter_list"))
        .map(|list| parameter_types(list, source))
        .unwrap_or_default();

    Declaration::new(DeclarationKind::Indexer, "", span_of(node))
        .with_parameter_types(parameters)
        .with_children(accessors(node, source))
}

fn method(node: Node<'_>, source: &str) -> Option<Declaration> {
    let name = name_of(node, source)?;
    let parameters = node
        .child_by_field_name("parameters")
        .or_else(|| child_of_kind(node, "parameter_list"))
        .map(|list| parameter_types(list, source))
        .unwrap_or_default();

    Some(
        Declaration::new(DeclarationKind::Method, name, span_of(node))
            .with_type_parameters(type_parameters(node, source))
            .with_parameter_types(parameters),
    )
}

fn parameter_types(list: Node<'_>, source: &str) -> Vec<String> {
    let mut cursor = list.walk();
    list.named_children(&mut cursor)
        .filter(|p| matches!(p.kind(), "parameter" | "parameter_array"))
        .map(|p| match p.child_by_field_name("type") {
            Some(ty) => strip_whitespace(text(ty, source)),
            None => untyped_parameter(p, source),
        })
        .collect()
}

/// Fallback for grammars without a `type` field: everything before the name.
fn untyped_parameter(parameter: Node<'_>, source: &str) -> String {
    match parameter.child_by_field_name("name") {
        Some(name) => strip_whitespace(&source[parameter.start_byte()..name.start_byte()]),
        None => strip_whitespace(text(parameter, source)),
    }
}

fn type_parameters(node: Node<'_>, source: &str) -> Vec<String> {
    let list = node
        .child_by_field_name("type_parameters")
        .or_else(|| child_of_kind(node, "type_parameter_list"));
    let Some(list) = list else {
        return Vec::new();
    };

    let mut cursor = list.walk();
    list.named_children(&mut cursor)
        .filter(|p| p.kind() == "type_parameter")
        .filter_map(|p| name_of(p, source))
        .collect()
}

fn name_of(node: Node<'_>, source: &str) -> Option<String> {
    if let Some(name) = node.child_by_field_name("name") {
        return Some(text(name, source).trim().to_string());
    }
    // Last identifier wins so variance keywords and attributes are skipped
    let mut cursor = node.walk();
    let ident = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "identifier")
        .last();
    ident.map(|n| text(n, source).trim().to_string())
}

fn body_of(node: Node<'_>) -> Option<Node<'_>> {
    node.child_by_field_name("body").or_else(|| {
        child_of_kind(node, "declaration_list")
            .or_else(|| child_of_kind(node, "enum_member_declaration_list"))
    })
}

fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|c| c.kind() == kind);
    found
}

fn span_of(node: Node<'_>) -> SourceSpan {
    SourceSpan::new(node.start_byte(), node.end_byte())
}

fn text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    &source[node.byte_range()]
}
