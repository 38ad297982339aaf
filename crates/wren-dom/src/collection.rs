//! Ordered, duplicate-free node sets.
//!
//! A [`TagCollection`] is what every search returns. It owns no nodes: it
//! is a list of [`NodeId`]s plus a set for O(1) duplicate rejection.
//! Inside one tree a `NodeId` is as unique as a uid, so the set is keyed
//! by id.
//!
//! The `get_elements_*` methods search each member *and* its whole
//! subtree. [`TagCollection::filter_collection`] looks at the members only.

use std::collections::HashSet;
use std::ops::{Add, AddAssign, Index, Sub, SubAssign};

use crate::node::{NodeId, Uid};
use crate::search::FindQuery;
use crate::tree::DomTree;

/// Ordered set of node references.
#[derive(Debug, Clone, Default)]
pub struct TagCollection {
    nodes: Vec<NodeId>,
    seen: HashSet<NodeId>,
}

impl TagCollection {
    /// An empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from any sequence, keeping the first occurrence of each node.
    pub fn from_nodes<I: IntoIterator<Item = NodeId>>(nodes: I) -> Self {
        nodes.into_iter().collect()
    }

    /// Append a node unless already present. Returns true if appended.
    pub fn push(&mut self, id: NodeId) -> bool {
        if self.seen.insert(id) {
            self.nodes.push(id);
            true
        } else {
            false
        }
    }

    /// Remove a node if present. Returns true if it was there.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if self.seen.remove(&id) {
            self.nodes.retain(|&node| node != id);
            true
        } else {
            false
        }
    }

    /// Membership test.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.seen.contains(&id)
    }

    /// Membership test by uid.
    #[must_use]
    pub fn contains_uid(&self, tree: &DomTree, uid: Uid) -> bool {
        self.nodes.iter().any(|&node| tree.uid(node) == uid)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    /// First node.
    #[must_use]
    pub fn first(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    /// Last node.
    #[must_use]
    pub fn last(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Nodes in order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// Nodes as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[NodeId] {
        &self.nodes
    }

    // =========================================================================
    // Searches over members and their subtrees
    // =========================================================================

    /// Everything reachable from the members (members included).
    #[must_use]
    pub fn get_all_nodes(&self, tree: &DomTree) -> Self {
        self.search(tree, |_, _| true)
    }

    /// Members or descendants with this tag name.
    #[must_use]
    pub fn get_elements_by_tag_name(&self, tree: &DomTree, tag_name: &str) -> Self {
        let tag_name = tag_name.to_ascii_lowercase();
        self.search(tree, |tree, node| tree.tag_name(node) == tag_name)
    }

    /// Members or descendants whose `name` attribute is `name`.
    #[must_use]
    pub fn get_elements_by_name(&self, tree: &DomTree, name: &str) -> Self {
        self.get_elements_by_attr(tree, "name", name)
    }

    /// First member or descendant whose `id` is `id_value`.
    #[must_use]
    pub fn get_element_by_id(&self, tree: &DomTree, id_value: &str) -> Option<NodeId> {
        self.nodes.iter().find_map(|&member| {
            tree.subtree(member)
                .find(|&node| tree.attribute(node, "id").is_some_and(|v| v == id_value))
        })
    }

    /// Members or descendants carrying this class token.
    #[must_use]
    pub fn get_elements_by_class_name(&self, tree: &DomTree, class_name: &str) -> Self {
        self.search(tree, |tree, node| tree.has_class(node, class_name))
    }

    /// Members or descendants whose attribute `name` equals `value`.
    #[must_use]
    pub fn get_elements_by_attr(&self, tree: &DomTree, name: &str, value: &str) -> Self {
        self.search(tree, |tree, node| {
            tree.attribute(node, name).is_some_and(|v| v == value)
        })
    }

    /// Members or descendants whose attribute `name` is any of `values`.
    #[must_use]
    pub fn get_elements_with_attr_values(&self, tree: &DomTree, name: &str, values: &[&str]) -> Self {
        self.search(tree, |tree, node| {
            tree.attribute(node, name)
                .is_some_and(|v| values.iter().any(|&wanted| wanted == v))
        })
    }

    /// Members or descendants accepted by `predicate`.
    #[must_use]
    pub fn get_elements_custom_filter<F>(&self, tree: &DomTree, predicate: F) -> Self
    where
        F: FnMut(&DomTree, NodeId) -> bool,
    {
        self.search(tree, predicate)
    }

    /// Members or descendants matching a [`FindQuery`].
    #[must_use]
    pub fn find(&self, tree: &DomTree, query: &FindQuery) -> Self {
        self.search(tree, |tree, node| query.matches(tree, node))
    }

    /// Members accepted by `predicate`, without looking at descendants.
    #[must_use]
    pub fn filter_collection<F>(&self, tree: &DomTree, mut predicate: F) -> Self
    where
        F: FnMut(&DomTree, NodeId) -> bool,
    {
        self.iter().filter(|&node| predicate(tree, node)).collect()
    }

    fn search<F>(&self, tree: &DomTree, mut predicate: F) -> Self
    where
        F: FnMut(&DomTree, NodeId) -> bool,
    {
        let mut found = Self::new();
        for &member in &self.nodes {
            for node in tree.subtree(member) {
                if !found.contains(node) && predicate(tree, node) {
                    let _ = found.push(node);
                }
            }
        }
        found
    }

    // =========================================================================
    // Tree operations
    // =========================================================================

    /// Detach every member from its parent. Returns how many were removed.
    pub fn remove_from_tree(&self, tree: &mut DomTree) -> usize {
        self.nodes.iter().filter(|&&node| tree.remove(node)).count()
    }

    /// Concatenated outer HTML of the members.
    #[must_use]
    pub fn to_html(&self, tree: &DomTree) -> String {
        self.nodes.iter().map(|&node| tree.outer_html(node)).collect()
    }
}

impl PartialEq for TagCollection {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
    }
}

impl Eq for TagCollection {}

impl FromIterator<NodeId> for TagCollection {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        let mut collection = Self::new();
        collection.extend(iter);
        collection
    }
}

impl Extend<NodeId> for TagCollection {
    fn extend<I: IntoIterator<Item = NodeId>>(&mut self, iter: I) {
        for id in iter {
            let _ = self.push(id);
        }
    }
}

impl IntoIterator for TagCollection {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a> IntoIterator for &'a TagCollection {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter().copied()
    }
}

impl Index<usize> for TagCollection {
    type Output = NodeId;

    fn index(&self, index: usize) -> &NodeId {
        &self.nodes[index]
    }
}

impl AddAssign<&Self> for TagCollection {
    fn add_assign(&mut self, other: &Self) {
        self.extend(other.iter());
    }
}

impl AddAssign for TagCollection {
    fn add_assign(&mut self, other: Self) {
        *self += &other;
    }
}

impl Add for TagCollection {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += &other;
        self
    }
}

impl SubAssign<&Self> for TagCollection {
    fn sub_assign(&mut self, other: &Self) {
        self.nodes.retain(|node| !other.seen.contains(node));
        self.seen.retain(|node| !other.seen.contains(node));
    }
}

impl SubAssign for TagCollection {
    fn sub_assign(&mut self, other: Self) {
        *self -= &other;
    }
}

impl Sub for TagCollection {
    type Output = Self;

    fn sub(mut self, other: Self) -> Self {
        self -= &other;
        self
    }
}
