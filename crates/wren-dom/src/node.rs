//! Node identity and storage.
//!
//! [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
//!
//! Nodes live in a [`DomTree`](crate::DomTree) arena and refer to each other
//! through [`NodeId`] indices. The parent owns its children through its
//! ordered [`Block`] list; `parent` and `owner_document` are plain handles
//! that never decide lifetime.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::attributes::AttributeStore;

/// A type-safe index into a [`DomTree`](crate::DomTree) arena.
///
/// Indices are never reused within one tree, so inside a tree a `NodeId`
/// identifies a node exactly as well as its [`Uid`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Process-unique identity of a node.
///
/// Assigned once at allocation and never changed. Clones get a fresh uid,
/// so two nodes can be tag-equal without being the same node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uid(u64);

impl Uid {
    pub(crate) fn next() -> Self {
        static NEXT_UID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_UID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "uid-{}", self.0)
    }
}

/// Process-unique identity of a document (one per [`DomTree`](crate::DomTree)).
///
/// [§ 4.4](https://dom.spec.whatwg.org/#concept-node-document)
/// "Each node has an associated node document"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(u64);

impl DocumentId {
    pub(crate) fn next() -> Self {
        static NEXT_DOCUMENT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_DOCUMENT.fetch_add(1, Ordering::Relaxed))
    }
}

/// One ordered child unit of a node.
///
/// The block list is the single source of document order. The element
/// children of a node are exactly its `Block::Tag` entries, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A child element.
    Tag(NodeId),
    /// A text fragment (comments and entity references are kept verbatim here).
    Text(String),
}

impl Block {
    /// The child element, if this block is one.
    #[must_use]
    pub const fn as_tag(&self) -> Option<NodeId> {
        match self {
            Self::Tag(id) => Some(*id),
            Self::Text(_) => None,
        }
    }

    /// The text fragment, if this block is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Tag(_) => None,
            Self::Text(text) => Some(text),
        }
    }
}

/// An element node.
///
/// Fields are private; every mutation goes through [`DomTree`](crate::DomTree)
/// so that parent links, owner documents and the class/style views stay in
/// sync.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) uid: Uid,
    pub(crate) tag_name: String,
    pub(crate) attributes: AttributeStore,
    pub(crate) is_self_closing: bool,
    pub(crate) blocks: Vec<Block>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) owner_document: Option<DocumentId>,
}

impl Node {
    pub(crate) fn new(tag_name: &str, is_self_closing: bool) -> Self {
        Self {
            uid: Uid::next(),
            tag_name: tag_name.to_ascii_lowercase(),
            attributes: AttributeStore::new(),
            is_self_closing,
            blocks: Vec::new(),
            parent: None,
            owner_document: None,
        }
    }

    /// Lowercased tag name.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// Identity token.
    #[must_use]
    pub const fn uid(&self) -> Uid {
        self.uid
    }

    /// The node's attributes (read-only view).
    #[must_use]
    pub const fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    /// Whether the node serializes as `<tag />` with no content.
    #[must_use]
    pub const fn is_self_closing(&self) -> bool {
        self.is_self_closing
    }

    /// Ordered child blocks.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Parent handle.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child elements, derived from the block list.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.blocks.iter().filter_map(Block::as_tag)
    }
}
