//! Mutable, queryable DOM tree for wren.
//!
//! This crate provides an arena-based element tree following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/), with the extras an
//! HTML scraping/editing library needs:
//!
//! - **Tree** ([`DomTree`]): elements with ordered text/element blocks,
//!   parent and owner-document handles, uid identity, cloning
//! - **Attributes** ([`AttributeStore`]): lowercased names, binary
//!   attributes, `class`/`style` kept in sync with [`ClassList`] and
//!   [`StyleMap`]
//! - **Properties** ([`PROPERTIES`]): script-style typed accessors with
//!   their clamping and default rules
//! - **Serialization**: `outer_html`, `inner_html`, XHTML output
//! - **Search**: tree walks and [`TagCollection`] set operations
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all
//! relationships, so parent links never form ownership cycles.

/// Attribute storage and the binary-attribute table.
pub mod attributes;
/// Class token list.
pub mod class_list;
/// Node sets returned by searches.
pub mod collection;
/// Attribute, class and style accessors.
mod element;
/// Element-name tables.
pub mod elements;
/// DOM error type.
pub mod error;
/// Node identity and block types.
pub mod node;
/// Script-style property dispatch table.
pub mod properties;
/// Tree-walk search.
pub mod search;
/// HTML/XHTML output.
mod serialize;
/// Inline style map.
pub mod style;
/// The arena tree.
pub mod tree;

pub use attributes::{
    Attr, AttributeStore, AttributeValue, BINARY_ATTRIBUTES, NamedNodeMap, StyleGuard,
    is_binary_attribute, is_valid_attribute_name,
};
pub use class_list::ClassList;
pub use collection::TagCollection;
pub use elements::{INVISIBLE_ROOT_TAG, VOID_ELEMENTS, is_void_element};
pub use error::DomError;
pub use node::{Block, DocumentId, Node, NodeId, Uid};
pub use properties::{PROPERTIES, PropertyKind, PropertySpec, PropertyValue, lookup_property};
pub use search::{FindQuery, MatchMode};
pub use style::{StyleMap, camel_to_dash, dash_to_camel};
pub use tree::{AncestorIterator, Descendants, DomTree};
