//! Ordered, deduplicated class tokens.
//!
//! [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes)
//! "The class attribute, if specified, must have a value that is a set of
//! space-separated tokens representing the various classes that the element
//! belongs to."

use std::fmt;

/// The token list behind an element's `class` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    /// Create an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Build a list from a `class` attribute value, dropping duplicates.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let mut list = Self::new();
        let _ = list.add(value);
        list
    }

    /// Add every whitespace-separated token in `value` not already present.
    ///
    /// Returns true if anything was added. Empty or whitespace-only input is
    /// a no-op.
    pub fn add(&mut self, value: &str) -> bool {
        let mut added = false;
        for token in value.split_whitespace() {
            if !self.contains(token) {
                self.tokens.push(token.to_string());
                added = true;
            }
        }
        added
    }

    /// Remove every whitespace-separated token in `value`.
    ///
    /// Returns the removed tokens (space-joined), or `None` if nothing in
    /// `value` was present.
    pub fn remove(&mut self, value: &str) -> Option<String> {
        let mut removed: Vec<String> = Vec::new();
        for token in value.split_whitespace() {
            if let Some(pos) = self.tokens.iter().position(|t| t == token) {
                removed.push(self.tokens.remove(pos));
            }
        }
        if removed.is_empty() {
            None
        } else {
            Some(removed.join(" "))
        }
    }

    /// Membership test for a single token.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Replace the whole list from an attribute value.
    pub fn set(&mut self, value: &str) {
        self.tokens.clear();
        let _ = self.add(value);
    }

    /// Remove all tokens.
    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when there are no tokens (the `class` attribute is then absent).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens in serialization order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Owned copy of the tokens.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.tokens.clone()
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}
