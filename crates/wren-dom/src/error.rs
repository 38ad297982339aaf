//! Errors raised by the DOM mutation and property API.

use thiserror::Error;

/// Errors from explicit DOM operations.
///
/// Parsing never produces these for recoverable input; they come from
/// calls that ask for something the tree cannot do.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// An attribute name failed the `[A-Za-z_][A-Za-z0-9_-]*` grammar.
    #[error("invalid attribute name: {name:?}")]
    InvalidAttributeName {
        /// The rejected name.
        name: String,
    },

    /// A numeric property was given a value outside its allowed range.
    #[error("index size error: {property} cannot be set to {value}")]
    IndexSize {
        /// Script-style property name.
        property: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A property was given a value of the wrong shape.
    #[error("invalid value for {property}: {value:?}")]
    InvalidPropertyValue {
        /// Script-style property name.
        property: &'static str,
        /// The rejected value.
        value: String,
    },

    /// No property of that name applies to this element.
    #[error("<{tag}> has no property {property:?}")]
    UnknownProperty {
        /// The requested property name.
        property: String,
        /// Tag name of the element.
        tag: String,
    },

    /// The property cannot be assigned.
    #[error("property {property} is read-only")]
    ReadOnlyProperty {
        /// Script-style property name.
        property: &'static str,
    },

    /// The reference node is not a child of the given parent.
    #[error("node is not a child of the given parent")]
    NotAChild,

    /// Void elements cannot hold children or text.
    #[error("<{tag}> is a void element and cannot have content")]
    VoidElement {
        /// Tag name of the void element.
        tag: String,
    },

    /// The insertion would make a node its own ancestor.
    #[error("cannot insert a node into itself or one of its descendants")]
    HierarchyRequest,
}
