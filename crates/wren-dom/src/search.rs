//! Tree-walk search.
//!
//! Every lookup takes a `from` scope: `None` searches the whole document
//! (the root itself included, unless it is the invisible wrapper) and
//! `Some(node)` searches only the descendants of `node`.

use crate::collection::TagCollection;
use crate::node::NodeId;
use crate::tree::DomTree;

/// How a [`FindQuery`] criterion compares values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The attribute value equals one of the candidates.
    Equals,
    /// The attribute value contains one of the candidates as a substring.
    Contains,
}

#[derive(Debug, Clone)]
struct Criterion {
    attribute: String,
    values: Vec<String>,
    mode: MatchMode,
}

/// A conjunction of attribute criteria for [`DomTree::find`].
///
/// Each criterion accepts a set of values (any may match); all criteria
/// must hold. The pseudo-attribute `tagname` matches the tag name
/// case-insensitively.
///
/// ```ignore
/// let query = FindQuery::new()
///     .equals("tagname", ["div", "span"])
///     .contains("class", ["warn"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FindQuery {
    criteria: Vec<Criterion>,
}

impl FindQuery {
    /// An empty query (matches every node).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `attribute` to equal one of `values`.
    #[must_use]
    pub fn equals<I, S>(self, attribute: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(attribute, values, MatchMode::Equals)
    }

    /// Require `attribute` to contain one of `values`.
    #[must_use]
    pub fn contains<I, S>(self, attribute: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(attribute, values, MatchMode::Contains)
    }

    fn with<I, S>(mut self, attribute: &str, values: I, mode: MatchMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.criteria.push(Criterion {
            attribute: attribute.to_ascii_lowercase(),
            values: values.into_iter().map(Into::into).collect(),
            mode,
        });
        self
    }

    /// True if `id` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        self.criteria.iter().all(|criterion| {
            let actual = if criterion.attribute == "tagname" {
                Some(tree.tag_name(id).to_string())
            } else {
                tree.attribute(id, &criterion.attribute).map(|v| v.into_owned())
            };
            let Some(actual) = actual else {
                return false;
            };
            let is_tag = criterion.attribute == "tagname";
            criterion.values.iter().any(|wanted| match criterion.mode {
                MatchMode::Equals if is_tag => actual.eq_ignore_ascii_case(wanted),
                MatchMode::Equals => actual == *wanted,
                MatchMode::Contains if is_tag => {
                    actual.contains(wanted.to_ascii_lowercase().as_str())
                }
                MatchMode::Contains => actual.contains(wanted.as_str()),
            })
        })
    }
}

impl DomTree {
    /// First node in document order whose `id` attribute is `id_value`.
    #[must_use]
    pub fn get_element_by_id(&self, from: Option<NodeId>, id_value: &str) -> Option<NodeId> {
        self.search_scope(from)
            .find(|&node| self.attribute(node, "id").is_some_and(|v| v == id_value))
    }

    /// Nodes whose `name` attribute is `name`.
    #[must_use]
    pub fn get_elements_by_name(&self, from: Option<NodeId>, name: &str) -> TagCollection {
        self.get_elements_by_attr(from, "name", name)
    }

    /// Nodes with the given tag name (case-insensitive).
    #[must_use]
    pub fn get_elements_by_tag_name(&self, from: Option<NodeId>, tag_name: &str) -> TagCollection {
        let tag_name = tag_name.to_ascii_lowercase();
        self.get_elements_custom_filter(from, |tree, node| tree.tag_name(node) == tag_name)
    }

    /// Nodes carrying the class token `class_name`.
    #[must_use]
    pub fn get_elements_by_class_name(&self, from: Option<NodeId>, class_name: &str) -> TagCollection {
        self.get_elements_custom_filter(from, |tree, node| tree.has_class(node, class_name))
    }

    /// Nodes whose attribute `name` equals `value` exactly.
    #[must_use]
    pub fn get_elements_by_attr(&self, from: Option<NodeId>, name: &str, value: &str) -> TagCollection {
        self.get_elements_custom_filter(from, |tree, node| {
            tree.attribute(node, name).is_some_and(|v| v == value)
        })
    }

    /// Nodes whose attribute `name` equals any of `values`.
    #[must_use]
    pub fn get_elements_with_attr_values(
        &self,
        from: Option<NodeId>,
        name: &str,
        values: &[&str],
    ) -> TagCollection {
        self.get_elements_custom_filter(from, |tree, node| {
            tree.attribute(node, name)
                .is_some_and(|v| values.iter().any(|&wanted| wanted == v))
        })
    }

    /// Nodes accepted by `predicate`.
    #[must_use]
    pub fn get_elements_custom_filter<F>(&self, from: Option<NodeId>, mut predicate: F) -> TagCollection
    where
        F: FnMut(&Self, NodeId) -> bool,
    {
        self.search_scope(from)
            .filter(|&node| predicate(self, node))
            .collect()
    }

    /// First node in document order accepted by `predicate`.
    #[must_use]
    pub fn get_first_element_custom_filter<F>(&self, from: Option<NodeId>, mut predicate: F) -> Option<NodeId>
    where
        F: FnMut(&Self, NodeId) -> bool,
    {
        self.search_scope(from).find(|&node| predicate(self, node))
    }

    /// Nodes matching a [`FindQuery`].
    #[must_use]
    pub fn find(&self, from: Option<NodeId>, query: &FindQuery) -> TagCollection {
        self.get_elements_custom_filter(from, |tree, node| query.matches(tree, node))
    }

    /// Every element of the document (the invisible wrapper excluded).
    #[must_use]
    pub fn get_all_nodes(&self) -> TagCollection {
        self.search_scope(None).collect()
    }
}
