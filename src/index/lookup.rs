use super::{IndexNode, MatchingIndex};
use thiserror::Error;
use tracing::debug;

/// Minimum Jaro-Winkler similarity for a sibling key to be offered as a hint.
const HINT_THRESHOLD: f64 = 0.8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("no member matches '{pattern}' (no '{chunk}' at this level)")]
    NotFound {
        pattern: String,
        chunk: String,
        /// Closest existing key at the level where lookup stopped
        suggestion: Option<String>,
    },
}

impl MatchingIndex {
    /// Resolve a member pattern to exactly one node.
    ///
    /// An empty pattern resolves to the root (the whole file). The node may
    /// carry several spans when the pattern names overloads or colliding
    /// declarations; callers extract all of them.
    pub fn find(&self, pattern: &str) -> Result<&IndexNode, LookupError> {
        let mut node = &self.root;
        for chunk in split_chunks(pattern) {
            node = match node.child(&chunk) {
                Some(next) => next,
                None => {
                    return Err(LookupError::NotFound {
                        pattern: pattern.to_string(),
                        suggestion: closest_key(node, &chunk),
                        chunk,
                    })
                }
            };
        }

        if node.spans().len() > 1 {
            debug!(
                pattern,
                matches = node.spans().len(),
                "selector resolved to several declarations"
            );
        }
        Ok(node)
    }
}

/// Split a member pattern into index chunks.
///
/// Dots separate chunks except inside brackets, so `Map{K.V}` stays whole. A
/// `(` or `[` at the top level starts its own chunk: `Foo(string, int)` yields
/// `Foo` and `(string,int)`. Whitespace is dropped everywhere.
pub fn split_chunks(pattern: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in pattern.chars() {
        match c {
            '.' if depth == 0 => flush(&mut chunks, &mut current),
            '(' | '[' if depth == 0 => {
                flush(&mut chunks, &mut current);
                current.push(c);
                depth += 1;
            }
            '(' | '[' | '{' | '<' => {
                current.push(c);
                depth += 1;
            }
            ')' | ']' | '}' | '>' => {
                current.push(c);
                depth = depth.saturating_sub(1);
            }
            c if c.is_whitespace() => {}
            c => current.push(c),
        }
    }
    flush(&mut chunks, &mut current);

    chunks
}

fn flush(chunks: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        chunks.push(std::mem::take(current));
    }
}

fn closest_key(node: &IndexNode, chunk: &str) -> Option<String> {
    node.keys()
        .map(|key| (strsim::jaro_winkler(key, chunk), key))
        .filter(|(score, _)| *score >= HINT_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}
