//! Declaration-addressing index.
//!
//! A trie keyed by name fragments. Every declaration is reachable from the root
//! by its fully-qualified path and by every trailing suffix of that path, so
//! `Outer.Inner.Run`, `Inner.Run` and `Run` all resolve to the same node. Exact
//! name collisions accumulate spans instead of overwriting each other.
//!
//! The index is built once per file and never mutated afterwards; share it
//! behind an [`std::sync::Arc`] for concurrent lookups.

pub mod builder;
pub mod lookup;
pub mod names;

pub use lookup::{split_chunks, LookupError};
pub use names::{fragments, qualified_paths, QualifiedPath};

use crate::decl::SourceSpan;
use std::collections::BTreeMap;

/// One trie node: children by fragment plus the spans addressed here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexNode {
    children: BTreeMap<String, IndexNode>,
    /// Sorted by start offset, unique by start offset
    spans: Vec<SourceSpan>,
}

impl IndexNode {
    pub fn child(&self, key: &str) -> Option<&IndexNode> {
        self.children.get(key)
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &IndexNode)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    pub fn spans(&self) -> &[SourceSpan] {
        &self.spans
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.values().map(IndexNode::node_count).sum::<usize>()
    }

    /// Attach a span; returns false when a span with the same start is present.
    pub(crate) fn add_span(&mut self, span: SourceSpan) -> bool {
        match self
            .spans
            .binary_search_by_key(&span.byte_start, |s| s.byte_start)
        {
            Ok(_) => false,
            Err(pos) => {
                self.spans.insert(pos, span);
                true
            }
        }
    }

    pub(crate) fn entry(&mut self, key: &str) -> &mut IndexNode {
        self.children.entry(key.to_string()).or_default()
    }

    pub(crate) fn insert_child(&mut self, key: String, node: IndexNode) {
        match self.children.get_mut(&key) {
            Some(existing) => existing.merge(node),
            None => {
                self.children.insert(key, node);
            }
        }
    }

    /// Create-or-union: spans are unioned, children merged recursively.
    pub(crate) fn merge(&mut self, other: IndexNode) {
        for span in other.spans {
            self.add_span(span);
        }
        for (key, child) in other.children {
            self.insert_child(key, child);
        }
    }

    /// Like [`IndexNode::merge`] but copies from a borrowed subtree.
    pub(crate) fn merge_from(&mut self, other: &IndexNode) {
        for span in &other.spans {
            self.add_span(*span);
        }
        for (key, child) in &other.children {
            match self.children.get_mut(key) {
                Some(existing) => existing.merge_from(child),
                None => {
                    self.children.insert(key.clone(), child.clone());
                }
            }
        }
    }
}

/// The finished index for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingIndex {
    root: IndexNode,
}

impl MatchingIndex {
    /// Root node; its only span covers the whole file.
    pub fn root(&self) -> &IndexNode {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_dedup_by_start_offset() {
        let mut node = IndexNode::default();
        assert!(node.add_span(SourceSpan::new(10, 20)));
        assert!(node.add_span(SourceSpan::new(0, 5)));
        assert!(!node.add_span(SourceSpan::new(10, 25)));

        let starts: Vec<_> = node.spans().iter().map(|s| s.byte_start).collect();
        assert_eq!(starts, vec![0, 10]);
    }

    #[test]
    fn merge_unions_instead_of_overwriting() {
        let mut left = IndexNode::default();
        left.entry("A").add_span(SourceSpan::new(0, 5));
        left.entry("A").entry("x").add_span(SourceSpan::new(1, 2));

        let mut right = IndexNode::default();
        right.entry("A").add_span(SourceSpan::new(10, 15));
        right.entry("A").entry("y").add_span(SourceSpan::new(11, 12));

        left.merge_from(&right);

        let a = left.child("A").unwrap();
        assert_eq!(a.spans().len(), 2);
        let keys: Vec<_> = a.keys().collect();
        assert_eq!(keys, vec!["x", "y"]);

        let mut owned = IndexNode::default();
        owned.merge(right.clone());
        owned.merge(right);
        assert_eq!(owned.child("A").unwrap().spans().len(), 1);
    }
}
