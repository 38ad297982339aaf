//! Arena-backed document tree.
//!
//! [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
//!
//! All nodes of a document live in one vector and refer to each other by
//! [`NodeId`]. Ownership runs strictly downwards through each node's block
//! list; `parent` and `owner_document` are handles that are set on attach
//! and cleared on detach, never followed to decide lifetime.
//!
//! Methods that take a [`NodeId`] panic if the id was not allocated by the
//! same tree. Ids are never reused, so an id stays valid after its node is
//! detached.
//!
//! A tree may be shared between threads for read-only queries. Concurrent
//! mutation of one tree is not supported; callers that need it must wrap
//! the tree in their own lock.

use std::collections::HashSet;

use crate::attributes::is_valid_attribute_name;
use crate::elements::{INVISIBLE_ROOT_TAG, is_void_element};
use crate::error::DomError;
use crate::node::{Block, DocumentId, Node, NodeId, Uid};

/// A parsed or hand-built document.
#[derive(Debug)]
pub struct DomTree {
    /// Every node ever allocated, indexed by `NodeId`.
    nodes: Vec<Node>,
    document_id: DocumentId,
    root: Option<NodeId>,
    /// Text of the first `<!...>` declaration, without the `<!` and `>`.
    doctype: Option<String>,
}

impl DomTree {
    /// Create an empty document with no root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            document_id: DocumentId::next(),
            root: None,
            doctype: None,
        }
    }

    /// Identity of this document, as reported by [`Self::owner_document`].
    #[must_use]
    pub const fn document_id(&self) -> DocumentId {
        self.document_id
    }

    /// Number of nodes allocated in the arena, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no node was ever allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Allocate a detached element. Void element names are always
    /// self-closing.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.alloc(Node::new(tag_name, is_void_element(tag_name)))
    }

    /// Allocate a detached element with attributes.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::InvalidAttributeName`] if any name fails the
    /// attribute-name grammar; nothing is allocated in that case.
    pub fn create_element_with_attributes(
        &mut self,
        tag_name: &str,
        attributes: &[(&str, &str)],
        is_self_closing: bool,
    ) -> Result<NodeId, DomError> {
        if let Some((name, _)) = attributes
            .iter()
            .find(|(name, _)| !is_valid_attribute_name(name))
        {
            return Err(DomError::InvalidAttributeName {
                name: (*name).to_string(),
            });
        }
        let mut node = Node::new(tag_name, is_self_closing || is_void_element(tag_name));
        for (name, value) in attributes {
            node.attributes.set(name, value);
        }
        Ok(self.alloc(node))
    }

    /// The structural root (possibly the invisible wrapper).
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Make `id` the document root, detaching it from any parent.
    /// `None` detaches the current root and leaves the document empty.
    pub fn set_root(&mut self, id: Option<NodeId>) {
        if let Some(old) = self.root.take() {
            self.set_owner_recursive(old, None);
        }
        if let Some(new_root) = id {
            self.detach(new_root);
            self.root = Some(new_root);
            self.set_owner_recursive(new_root, Some(self.document_id));
        }
    }

    /// The document's declaration text (e.g. `DOCTYPE html`), if any.
    #[must_use]
    pub fn doctype(&self) -> Option<&str> {
        self.doctype.as_deref()
    }

    /// Replace the declaration text.
    pub fn set_doctype(&mut self, doctype: Option<String>) {
        self.doctype = doctype;
    }

    /// True if `id` is the synthetic multi-root wrapper.
    #[must_use]
    pub fn is_invisible_root(&self, id: NodeId) -> bool {
        self.root == Some(id) && self.node(id).tag_name == INVISIBLE_ROOT_TAG
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// [§ 4.2.3 Mutation algorithms](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// Append `child` as the last child of `parent`, first removing it from
    /// wherever it currently is. A self-closing non-void parent stops being
    /// self-closing.
    ///
    /// # Errors
    ///
    /// [`DomError::VoidElement`] if `parent` is a void element and
    /// [`DomError::HierarchyRequest`] if `child` is `parent` or one of its
    /// ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, DomError> {
        self.check_insert(parent, child)?;
        self.detach(child);
        self.node_mut(parent).blocks.push(Block::Tag(child));
        self.adopt(parent, child);
        Ok(child)
    }

    /// Append a text block to `parent`. Empty text is ignored.
    ///
    /// # Errors
    ///
    /// [`DomError::VoidElement`] if `parent` is a void element.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<(), DomError> {
        self.check_content(parent)?;
        if text.is_empty() {
            return Ok(());
        }
        let node = self.node_mut(parent);
        node.is_self_closing = false;
        node.blocks.push(Block::Text(text.to_string()));
        Ok(())
    }

    /// Insert `child` before `reference` among `parent`'s blocks. A `None`
    /// reference appends.
    ///
    /// # Errors
    ///
    /// [`DomError::NotAChild`] if `reference` is not a child of `parent`,
    /// plus the errors of [`Self::append_child`].
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<NodeId, DomError> {
        let Some(reference) = reference else {
            return self.append_child(parent, child);
        };
        self.insert_relative(parent, child, reference, 0)
    }

    /// Insert `child` right after `reference` among `parent`'s blocks. A
    /// `None` reference appends.
    ///
    /// # Errors
    ///
    /// Same as [`Self::insert_before`].
    pub fn insert_after(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<NodeId, DomError> {
        let Some(reference) = reference else {
            return self.append_child(parent, child);
        };
        self.insert_relative(parent, child, reference, 1)
    }

    fn insert_relative(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
        offset: usize,
    ) -> Result<NodeId, DomError> {
        if self.node(reference).parent != Some(parent) {
            return Err(DomError::NotAChild);
        }
        if child == reference {
            return Ok(child);
        }
        self.check_insert(parent, child)?;
        self.detach(child);
        let pos = self
            .block_position(parent, reference)
            .ok_or(DomError::NotAChild)?;
        self.node_mut(parent)
            .blocks
            .insert(pos + offset, Block::Tag(child));
        self.adopt(parent, child);
        Ok(child)
    }

    /// [§ 4.2.3](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Remove `child` from `parent`. Clears the parent link and the owner
    /// document of `child` and its whole subtree. Returns `None` if `child`
    /// was not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Option<NodeId> {
        if self.get(child)?.parent != Some(parent) {
            return None;
        }
        self.detach(child);
        self.set_owner_recursive(child, None);
        Some(child)
    }

    /// Remove a node from its parent. Returns false if it had none, which
    /// makes a second call a no-op.
    pub fn remove(&mut self, id: NodeId) -> bool {
        match self.node(id).parent {
            Some(parent) => self.remove_child(parent, id).is_some(),
            None => false,
        }
    }

    /// Remove every child element of `id` (text blocks stay). Returns the
    /// removed nodes in document order.
    pub fn remove_children(&mut self, id: NodeId) -> Vec<NodeId> {
        let children: Vec<NodeId> = self.children(id).collect();
        children
            .into_iter()
            .filter_map(|child| self.remove_child(id, child))
            .collect()
    }

    /// Replace all content of `id` with a single text block.
    ///
    /// # Errors
    ///
    /// [`DomError::VoidElement`] if `id` is a void element.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        self.check_content(id)?;
        let _ = self.remove_children(id);
        let node = self.node_mut(id);
        node.blocks.clear();
        if !text.is_empty() {
            node.is_self_closing = false;
            node.blocks.push(Block::Text(text.to_string()));
        }
        Ok(())
    }

    /// Shallow copy: same tag name, attributes and self-closing flag, no
    /// content, new uid, detached.
    pub fn clone_node(&mut self, id: NodeId) -> NodeId {
        let source = self.node(id);
        let mut copy = Node::new(&source.tag_name, source.is_self_closing);
        copy.attributes = source.attributes.clone();
        self.alloc(copy)
    }

    /// Recursive copy of `id` and everything below it. Every copied node
    /// gets a new uid; the copy is detached.
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let copy = self.clone_node(id);
        for block in self.node(id).blocks.clone() {
            match block {
                Block::Tag(child) => {
                    let child_copy = self.deep_clone(child);
                    self.push_child_unchecked(copy, child_copy);
                }
                Block::Text(text) => self.node_mut(copy).blocks.push(Block::Text(text)),
            }
        }
        copy
    }

    /// Copy a subtree out of another tree into this one, detached.
    pub fn import_node(&mut self, other: &Self, id: NodeId) -> NodeId {
        let source = other.node(id);
        let mut copy = Node::new(&source.tag_name, source.is_self_closing);
        copy.attributes = source.attributes.clone();
        let copy = self.alloc(copy);
        for block in &source.blocks {
            match block {
                Block::Tag(child) => {
                    let child_copy = self.import_node(other, *child);
                    self.push_child_unchecked(copy, child_copy);
                }
                Block::Text(text) => self.node_mut(copy).blocks.push(Block::Text(text.clone())),
            }
        }
        copy
    }

    fn push_child_unchecked(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(parent).blocks.push(Block::Tag(child));
        self.node_mut(child).parent = Some(parent);
    }

    fn check_content(&self, parent: NodeId) -> Result<(), DomError> {
        let tag = &self.node(parent).tag_name;
        if is_void_element(tag) {
            return Err(DomError::VoidElement { tag: tag.clone() });
        }
        Ok(())
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_content(parent)?;
        if parent == child || self.is_ancestor_of(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        Ok(())
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.node_mut(child).parent.take() {
            self.node_mut(parent)
                .blocks
                .retain(|block| *block != Block::Tag(child));
        }
        if self.root == Some(child) {
            self.root = None;
        }
    }

    fn adopt(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).is_self_closing = false;
        let owner = self.node(parent).owner_document;
        self.set_owner_recursive(child, owner);
    }

    fn set_owner_recursive(&mut self, id: NodeId, owner: Option<DocumentId>) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node_mut(current);
            node.owner_document = owner;
            stack.extend(node.blocks.iter().filter_map(Block::as_tag));
        }
    }

    fn block_position(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.node(parent)
            .blocks
            .iter()
            .position(|block| *block == Block::Tag(child))
    }

    // =========================================================================
    // Identity and equality
    // =========================================================================

    /// Identity token of a node.
    #[must_use]
    pub fn uid(&self, id: NodeId) -> Uid {
        self.node(id).uid
    }

    /// Identity comparison: true only for the very same node.
    #[must_use]
    pub fn is_same_node(&self, a: NodeId, b: NodeId) -> bool {
        self.node(a).uid == self.node(b).uid
    }

    /// Structural comparison: same tag name and attribute set, ignoring
    /// identity and children.
    #[must_use]
    pub fn is_tag_equal(&self, a: NodeId, b: NodeId) -> bool {
        self.is_tag_equal_across(a, self, b)
    }

    /// [`Self::is_tag_equal`] for nodes that live in different trees.
    #[must_use]
    pub fn is_tag_equal_across(&self, a: NodeId, other: &Self, b: NodeId) -> bool {
        let (left, right) = (self.node(a), other.node(b));
        left.tag_name == right.tag_name && left.attributes.same_attributes(&right.attributes)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Lowercased tag name.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> &str {
        &self.node(id).tag_name
    }

    /// Whether the node has no content and serializes as `<tag />`.
    #[must_use]
    pub fn is_self_closing(&self, id: NodeId) -> bool {
        self.node(id).is_self_closing
    }

    /// Ordered blocks of a node.
    #[must_use]
    pub fn blocks(&self, id: NodeId) -> &[Block] {
        &self.node(id).blocks
    }

    /// Child elements in document order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).children()
    }

    /// Number of child elements.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    /// Concatenation of the node's own text blocks.
    #[must_use]
    pub fn text(&self, id: NodeId) -> String {
        self.node(id)
            .blocks
            .iter()
            .filter_map(Block::as_text)
            .collect()
    }

    /// All text below the node, in document order.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        for block in &self.node(id).blocks {
            match block {
                Block::Text(text) => out.push_str(text),
                Block::Tag(child) => self.collect_text(*child, out),
            }
        }
    }

    /// Parent node, including the invisible wrapper root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Parent node, hiding the invisible wrapper root.
    #[must_use]
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| !self.is_invisible_root(p))
    }

    /// Document the node is attached to, or `None` when detached.
    #[must_use]
    pub fn owner_document(&self, id: NodeId) -> Option<DocumentId> {
        self.node(id).owner_document
    }

    /// True if the node is reachable from this document's root.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|node| node.owner_document == Some(self.document_id))
    }

    /// True if a node with this uid is reachable from the root.
    #[must_use]
    pub fn contains_uid(&self, uid: Uid) -> bool {
        self.nodes
            .iter()
            .any(|node| node.uid == uid && node.owner_document == Some(self.document_id))
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// True if `ancestor` is a proper ancestor of `node`.
    #[must_use]
    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|id| id == ancestor)
    }

    /// Nearest ancestor matching `predicate`.
    #[must_use]
    pub fn get_parent_element_custom_filter<F>(&self, id: NodeId, mut predicate: F) -> Option<NodeId>
    where
        F: FnMut(&Self, NodeId) -> bool,
    {
        self.ancestors(id)
            .filter(|&ancestor| !self.is_invisible_root(ancestor))
            .find(|&ancestor| predicate(self, ancestor))
    }

    /// First child element.
    #[must_use]
    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).next()
    }

    /// Last child element.
    #[must_use]
    pub fn last_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last()
    }

    /// Position of the node among its parent's child elements.
    #[must_use]
    pub fn child_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).position(|child| child == id)
    }

    /// Next sibling element.
    #[must_use]
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let mut siblings = self.children(parent).skip_while(|&child| child != id);
        let _ = siblings.next();
        siblings.next()
    }

    /// Previous sibling element.
    #[must_use]
    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        self.children(parent).take_while(|&child| child != id).last()
    }

    /// The other child elements of this node's parent.
    #[must_use]
    pub fn peers(&self, id: NodeId) -> Vec<NodeId> {
        self.parent(id).map_or_else(Vec::new, |parent| {
            self.children(parent).filter(|&child| child != id).collect()
        })
    }

    /// Pre-order walk of everything below `id` (not including `id`).
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).collect();
        stack.reverse();
        Descendants { tree: self, stack }
    }

    /// Pre-order walk of `id` and everything below it.
    #[must_use]
    pub fn subtree(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }

    /// All descendants of `id` in document order.
    #[must_use]
    pub fn get_all_child_nodes(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants(id).collect()
    }

    /// Uids of `id` and all its descendants.
    #[must_use]
    pub fn get_all_node_uids(&self, id: NodeId) -> HashSet<Uid> {
        self.subtree(id).map(|node| self.uid(node)).collect()
    }

    /// The structural root (same as [`Self::root`]).
    #[must_use]
    pub const fn get_root(&self) -> Option<NodeId> {
        self.root
    }

    /// The true top-level elements: the wrapper's children when the
    /// document had several roots, otherwise just the root.
    #[must_use]
    pub fn get_root_nodes(&self) -> Vec<NodeId> {
        match self.root {
            None => Vec::new(),
            Some(root) if self.is_invisible_root(root) => self.children(root).collect(),
            Some(root) => vec![root],
        }
    }

    /// Candidate nodes for a search: the whole document (root included
    /// unless it is the invisible wrapper) or the descendants of `from`.
    pub(crate) fn search_scope(&self, from: Option<NodeId>) -> Descendants<'_> {
        match (from, self.root) {
            (Some(node), _) => self.descendants(node),
            (None, Some(root)) if self.is_invisible_root(root) => self.descendants(root),
            (None, Some(root)) => self.subtree(root),
            (None, None) => Descendants {
                tree: self,
                stack: Vec::new(),
            },
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let first_new = self.stack.len();
        self.stack.extend(self.tree.children(id));
        self.stack[first_new..].reverse();
        Some(id)
    }
}
