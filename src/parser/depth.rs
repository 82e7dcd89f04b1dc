//! Row nesting depth from styled-component class signatures.
//!
//! The docs site never renders an explicit indentation level. Each property row's last
//! class token is a generated hash, and rows at the same nesting level share it. We hand
//! out depths in first-seen order: the first distinct signature in a section is depth 0,
//! the next one depth 1, and so on.
//!
//! This is a heuristic. It assumes one signature per level within a section and that a
//! shallower level always shows up before a deeper one. Nothing in the site's build
//! guarantees either, so a section whose first row is nested will decode wrong.

use indexmap::IndexMap;

pub trait DepthResolver {
    fn resolve(&mut self, signature: &str) -> usize;

    /// Forget every signature. Called at each section boundary.
    fn reset(&mut self);
}

/// Memoizing first-seen counter keyed by signature.
#[derive(Debug, Default)]
pub struct FirstSeenDepth {
    depths: IndexMap<String, usize>,
}

impl FirstSeenDepth {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DepthResolver for FirstSeenDepth {
    fn resolve(&mut self, signature: &str) -> usize {
        let next = self.depths.len();
        *self.depths.entry(signature.to_string()).or_insert(next)
    }

    fn reset(&mut self) {
        self.depths.clear();
    }
}

/// The structural signature of a row: the last token of its class attribute.
/// Rows with fewer than two class tokens carry no signature.
pub fn row_signature(class_attr: &str) -> Option<&str> {
    let tokens: Vec<&str> = class_attr.split_whitespace().collect();
    if tokens.len() < 2 {
        return None;
    }
    tokens.last().copied()
}
