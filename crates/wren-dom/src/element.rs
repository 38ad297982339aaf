//! Attribute, class and style accessors on [`DomTree`].
//!
//! Everything here goes through the node's [`AttributeStore`] so the
//! `class` and `style` views stay synchronized with the token list and
//! the style map.

use std::borrow::Cow;

use crate::attributes::{
    AttributeStore, AttributeValue, NamedNodeMap, StyleGuard, is_binary_attribute,
    is_valid_attribute_name,
};
use crate::error::DomError;
use crate::node::NodeId;
use crate::style::StyleMap;
use crate::tree::DomTree;

impl DomTree {
    /// The node's attribute store.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> &AttributeStore {
        &self.node(id).attributes
    }

    /// Read an attribute.
    ///
    /// Binary attributes (`checked`, `disabled`, ...) come back as
    /// [`AttributeValue::Flag`] whatever their stored value.
    #[must_use]
    pub fn get_attribute(&self, id: NodeId, name: &str) -> AttributeValue {
        let value = self.attribute(id, name);
        if is_binary_attribute(name) {
            return AttributeValue::Flag(value.is_some());
        }
        value.map_or(AttributeValue::Unset, |v| AttributeValue::Text(v.into_owned()))
    }

    /// The stored string of an attribute, or `default` when unset.
    #[must_use]
    pub fn get_attribute_or(&self, id: NodeId, name: &str, default: &str) -> String {
        self.attribute(id, name)
            .map_or_else(|| default.to_string(), Cow::into_owned)
    }

    /// The raw stored string of an attribute.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<Cow<'_, str>> {
        self.node(id).attributes.get(name)
    }

    /// Whether the attribute is present.
    #[must_use]
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.node(id).attributes.contains(name)
    }

    /// Set an attribute after checking its name.
    ///
    /// # Errors
    ///
    /// [`DomError::InvalidAttributeName`] if `name` does not match
    /// `[A-Za-z_][A-Za-z0-9_-]*`.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        if !is_valid_attribute_name(name) {
            return Err(DomError::InvalidAttributeName {
                name: name.to_string(),
            });
        }
        self.raw_set_attribute(id, name, value);
        Ok(())
    }

    /// Set an attribute without checking its name. The tree builder uses
    /// this after it has already filtered names.
    pub fn raw_set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        self.node_mut(id).attributes.set(name, value);
    }

    /// Remove an attribute; absent attributes are a no-op.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.node_mut(id).attributes.remove(name)
    }

    /// Attributes as ordered `(name, value)` pairs. `class` and `style`
    /// appear only when non-empty.
    #[must_use]
    pub fn attributes_as_map(&self, id: NodeId) -> Vec<(String, String)> {
        self.node(id).attributes.to_pairs()
    }

    /// Attributes as DOM `Attr` objects.
    #[must_use]
    pub fn attributes_as_node_map(&self, id: NodeId) -> NamedNodeMap {
        NamedNodeMap::from_store(&self.node(id).attributes, id)
    }

    // =========================================================================
    // Class list
    // =========================================================================

    /// Add one or more whitespace-separated classes.
    pub fn add_class(&mut self, id: NodeId, class_name: &str) {
        self.node_mut(id).attributes.add_class(class_name);
    }

    /// Remove one or more whitespace-separated classes. Returns `None` when
    /// none of them were present.
    pub fn remove_class(&mut self, id: NodeId, class_name: &str) -> Option<String> {
        self.node_mut(id).attributes.remove_class(class_name)
    }

    /// Whether the node carries this class token.
    #[must_use]
    pub fn has_class(&self, id: NodeId, class_name: &str) -> bool {
        self.node(id).attributes.class_list().contains(class_name)
    }

    /// The `class` attribute string (empty when there are no classes).
    #[must_use]
    pub fn class_name(&self, id: NodeId) -> String {
        self.node(id).attributes.class_list().to_string()
    }

    /// Replace all classes.
    pub fn set_class_name(&mut self, id: NodeId, class_name: &str) {
        self.node_mut(id).attributes.set_class_name(class_name);
    }

    /// The class tokens in order.
    #[must_use]
    pub fn class_list(&self, id: NodeId) -> Vec<String> {
        self.node(id).attributes.class_list().to_vec()
    }

    // =========================================================================
    // Inline style
    // =========================================================================

    /// The parsed inline style.
    #[must_use]
    pub fn style(&self, id: NodeId) -> &StyleMap {
        self.node(id).attributes.style()
    }

    /// Mutable inline style; the `style` attribute follows on drop.
    pub fn style_mut(&mut self, id: NodeId) -> StyleGuard<'_> {
        self.node_mut(id).attributes.style_mut()
    }

    /// One style property, by CSS or camelCase name.
    #[must_use]
    pub fn get_style_property(&self, id: NodeId, property: &str) -> Option<&str> {
        self.style(id).get(property)
    }

    /// Set one style property; an empty value removes it.
    pub fn set_style_property(&mut self, id: NodeId, property: &str, value: &str) {
        self.style_mut(id).set(property, value);
    }
}
