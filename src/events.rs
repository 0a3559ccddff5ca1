//! Typed document events.
//!
//! The XML driver reduces the quick-xml event stream to these three shapes,
//! which is all the result-set grammar needs. Keeping the enum explicit makes
//! the state machine testable against synthetic sequences without an XML
//! source.

use std::collections::HashMap;

/// One structural event over the document, in document order.
#[derive(Debug, Clone)]
pub enum DocEvent {
    Open { tag: String, attrs: AttrMap },
    Close { tag: String },
    Text(String),
}

/// Attribute set of a single element, already charset-normalized.
#[derive(Debug, Clone, Default)]
pub struct AttrMap(HashMap<String, String>);

impl AttrMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// True when the attribute is present with the literal value `yes`.
    pub fn is_yes(&self, name: &str) -> bool {
        self.get(name) == Some("yes")
    }

    /// Tri-state read of a yes/no attribute; `None` when absent or neither.
    pub fn yes_no(&self, name: &str) -> Option<bool> {
        match self.get(name) {
            Some("yes") => Some(true),
            Some("no") => Some(false),
            _ => None,
        }
    }
}

impl FromIterator<(String, String)> for AttrMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        AttrMap(iter.into_iter().collect())
    }
}
