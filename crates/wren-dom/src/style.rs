//! Inline style declarations.
//!
//! A [`StyleMap`] is the parsed form of a `style` attribute: an
//! insertion-ordered list of dash-cased property names and their values.
//! Accessors take either the CSS name (`padding-top`) or the script-style
//! camelCase name (`paddingTop`).

use std::fmt;

/// Convert a camelCase property name to its dash-cased CSS form.
///
/// Names that are already dash-cased come back unchanged.
#[must_use]
pub fn camel_to_dash(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert a dash-cased CSS property name to camelCase.
#[must_use]
pub fn dash_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '-' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Parsed `style` attribute.
///
/// Equality is set-equality over `(property, value)` pairs, so
/// `"color: red; top: 0"` equals `"top: 0; color: red"`.
#[derive(Debug, Clone, Default)]
pub struct StyleMap {
    entries: Vec<(String, String)>,
}

impl StyleMap {
    /// Create an empty style map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parse a `;`-separated list of `prop: value` declarations.
    ///
    /// Declarations without a colon or with an empty name or value are
    /// skipped. A repeated property keeps its first position and its last
    /// value.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut map = Self::new();
        for declaration in text.split(';') {
            let Some((name, value)) = declaration.split_once(':') else {
                continue;
            };
            map.set(name, value);
        }
        map
    }

    /// Value of a property, by CSS or camelCase name.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        let key = Self::normalize(property);
        self.entries
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Set a property. An empty (after trimming) value removes it instead.
    pub fn set(&mut self, property: &str, value: &str) {
        let key = Self::normalize(property);
        let value = value.trim();
        if key.is_empty() {
            return;
        }
        if value.is_empty() {
            let _ = self.remove(&key);
            return;
        }
        match self.entries.iter_mut().find(|(name, _)| *name == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key, value.to_string())),
        }
    }

    /// Remove a property, returning its old value.
    pub fn remove(&mut self, property: &str) -> Option<String> {
        let key = Self::normalize(property);
        let pos = self.entries.iter().position(|(name, _)| *name == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Remove every declaration.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no declarations (the `style` attribute is then absent).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declarations in insertion order, with dash-cased names.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    fn normalize(property: &str) -> String {
        let property = property.trim();
        // All-caps names are not camelCase
        if property.chars().any(|c| c.is_ascii_lowercase()) {
            camel_to_dash(property)
        } else {
            property.to_ascii_lowercase()
        }
    }
}

impl PartialEq for StyleMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(name, value)| other.get(name) == Some(value.as_str()))
    }
}

impl Eq for StyleMap {}

impl fmt::Display for StyleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_accepts_both_spellings() {
        assert_eq!(StyleMap::normalize("paddingTop"), "padding-top");
        assert_eq!(StyleMap::normalize(" padding-top "), "padding-top");
        assert_eq!(StyleMap::normalize("COLOR"), "color");
    }
}
