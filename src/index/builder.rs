//! Index construction.
//!
//! Each declaration builds a local subtree out of its children's subtrees. When
//! a fragment level is complete, a copy of it is merged into the global root
//! under that level's key (innermost level first); the outermost level is handed
//! back to the parent. Top-level declarations merge straight into the root.

use super::names::fragments;
use super::{IndexNode, MatchingIndex};
use crate::decl::{Declaration, DeclarationKind, DeclarationTree};
use tracing::debug;

impl MatchingIndex {
    /// Build the index for one file. Never fails on a well-formed tree.
    pub fn build(tree: &DeclarationTree) -> Self {
        let mut root = IndexNode::default();
        root.add_span(tree.span);

        for decl in &tree.declarations {
            let local = visit(decl, &mut root);
            root.merge(local);
        }

        debug!(
            declarations = tree.walk().count(),
            nodes = root.node_count(),
            "built matching index"
        );

        MatchingIndex { root }
    }
}

/// Returns the declaration's contribution to its parent: a span-less node whose
/// children are keyed by the outermost fragment.
fn visit(decl: &Declaration, global: &mut IndexNode) -> IndexNode {
    let mut local = IndexNode::default();
    for child in &decl.children {
        let contribution = visit(child, global);
        local.merge(contribution);
    }

    let levels = fragments(decl);
    if levels.is_empty() {
        // Nameless declaration: its members belong to the enclosing scope
        return local;
    }

    let mut subtree = local;
    subtree.add_span(decl.span);

    for (depth, key) in levels.iter().enumerate().rev() {
        global.entry(key).merge_from(&subtree);

        let mut wrapper = IndexNode::default();
        wrapper.insert_child(key.clone(), subtree);
        // A bare method name addresses every overload; namespace prefixes
        // only address the blocks declared under that exact name
        if depth > 0 && decl.kind == DeclarationKind::Method {
            wrapper.add_span(decl.span);
        }
        subtree = wrapper;
    }

    subtree
}
