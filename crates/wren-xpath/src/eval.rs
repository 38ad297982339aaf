//! Expression evaluation.
//!
//! The evaluator threads a [`TagCollection`] through the compiled
//! operations. Steps replace the collection, predicates filter it, and an
//! empty collection ends evaluation early. The invisible multi-root wrapper
//! never appears in a result and is skipped when walking up the tree.

use std::collections::HashSet;

use tracing::debug;
use wren_dom::{DomTree, NodeId, TagCollection};

use crate::XPathExpression;
use crate::body::BodyExpr;
use crate::config::XPathConfig;
use crate::error::XPathError;
use crate::functions::NodeFacts;
use crate::operation::{Axis, NameTest, Operation, TagStep};
use crate::value::BodyValue;

/// Runs compiled expressions against one tree.
#[derive(Debug, Clone, Copy)]
pub struct XPathEvaluator<'a> {
    tree: &'a DomTree,
    config: &'a XPathConfig,
}

impl<'a> XPathEvaluator<'a> {
    /// Create an evaluator over `tree`.
    #[must_use]
    pub const fn new(tree: &'a DomTree, config: &'a XPathConfig) -> Self {
        Self { tree, config }
    }

    /// Evaluate `expr` with `start` as the children of the virtual document
    /// node a `/` or `//` first step works from. Relative first steps such
    /// as `.` or `parent::div` start at the `start` nodes themselves.
    ///
    /// # Errors
    ///
    /// [`XPathError::Runtime`] when a predicate hits a type mismatch.
    pub fn evaluate(&self, expr: &XPathExpression, start: &TagCollection) -> Result<TagCollection, XPathError> {
        let mut current = TagCollection::new();
        let mut name_test = NameTest::Any;

        for operation in expr.operations() {
            match operation {
                Operation::Step(step) => {
                    current = if step.first {
                        self.first_step(step, start)
                    } else {
                        self.next_step(step, &current)
                    };
                    name_test = step.name.clone();
                }
                Operation::Predicate(body) => {
                    current = self.filter(body, &current, &name_test)?;
                }
            }
            if self.config.debug {
                debug!(
                    expression = expr.source(),
                    operation = %operation,
                    nodes = current.len(),
                    "evaluated XPath operation"
                );
            }
            if current.is_empty() {
                break;
            }
        }
        Ok(current)
    }

    /// Evaluate `expr` from the document's top-level elements.
    ///
    /// # Errors
    ///
    /// See [`Self::evaluate`].
    pub fn evaluate_document(&self, expr: &XPathExpression) -> Result<TagCollection, XPathError> {
        let start = TagCollection::from_nodes(self.tree.get_root_nodes());
        self.evaluate(expr, &start)
    }

    // =========================================================================
    // Steps
    // =========================================================================

    fn first_step(&self, step: &TagStep, start: &TagCollection) -> TagCollection {
        if step.relative {
            let mut found = TagCollection::new();
            for node in start.iter() {
                found.extend(self.follow(step.axis, node));
            }
            return self.name_filter(found, &step.name);
        }
        let subtree = self.closure(start.iter());
        let found = match (step.multi_level, step.axis) {
            (false, Axis::Child) => start.clone(),
            (_, Axis::Descendant | Axis::DescendantOrSelf) | (true, Axis::Child | Axis::SelfAxis) => {
                subtree
            }
            (false, _) => TagCollection::new(),
            (true, axis) => {
                // Walking up must stop at the virtual document node.
                let inside: HashSet<NodeId> = subtree.iter().collect();
                let mut found = TagCollection::new();
                for node in subtree.iter() {
                    for hit in self.follow(axis, node) {
                        if inside.contains(&hit) {
                            let _ = found.push(hit);
                        }
                    }
                }
                found
            }
        };
        self.name_filter(found, &step.name)
    }

    fn next_step(&self, step: &TagStep, context: &TagCollection) -> TagCollection {
        let base = if step.multi_level {
            self.closure(context.iter())
        } else {
            context.clone()
        };
        let mut found = TagCollection::new();
        for node in base.iter() {
            found.extend(self.follow(step.axis, node));
        }
        self.name_filter(found, &step.name)
    }

    /// Nodes reached from `node` along `axis`, nearest first.
    fn follow(&self, axis: Axis, node: NodeId) -> Vec<NodeId> {
        let tree = self.tree;
        match axis {
            Axis::Child => tree.children(node).collect(),
            Axis::Descendant => tree.descendants(node).collect(),
            Axis::DescendantOrSelf => tree.subtree(node).collect(),
            Axis::SelfAxis => vec![node],
            Axis::Parent => tree.parent_element(node).into_iter().collect(),
            Axis::Ancestor => self.visible_ancestors(node).collect(),
            Axis::AncestorOrSelf => std::iter::once(node).chain(self.visible_ancestors(node)).collect(),
        }
    }

    fn visible_ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.tree
            .ancestors(node)
            .filter(|&ancestor| !self.tree.is_invisible_root(ancestor))
    }

    /// Every node in or below the given nodes, in document order per root.
    fn closure(&self, nodes: impl Iterator<Item = NodeId>) -> TagCollection {
        let mut all = TagCollection::new();
        for node in nodes {
            all.extend(self.tree.subtree(node));
        }
        all
    }

    fn name_filter(&self, found: TagCollection, name: &NameTest) -> TagCollection {
        found
            .into_iter()
            .filter(|&node| !self.tree.is_invisible_root(node) && name.matches(self.tree.tag_name(node)))
            .collect()
    }

    // =========================================================================
    // Predicates
    // =========================================================================

    fn filter(
        &self,
        body: &BodyExpr,
        current: &TagCollection,
        name_test: &NameTest,
    ) -> Result<TagCollection, XPathError> {
        let mut kept = TagCollection::new();
        for node in current.iter() {
            let (position, last) = self.sibling_position(node, name_test);
            let text = self.tree.text(node);
            let facts = NodeFacts {
                position,
                last,
                text: &text,
                name: self.tree.tag_name(node),
            };
            let keep = match body.evaluate(self.tree, node, &facts)? {
                BodyValue::Number(n) => (position as f64 - n).abs() < f64::EPSILON,
                BodyValue::Boolean(b) => b,
                BodyValue::Str(_) => true,
                BodyValue::Null => false,
            };
            if keep {
                let _ = kept.push(node);
            }
        }
        Ok(kept)
    }

    /// 1-based position of `node` among its parent's children that share
    /// its tag name (all element children after `*`), and the group size.
    fn sibling_position(&self, node: NodeId, name_test: &NameTest) -> (usize, usize) {
        let Some(parent) = self.tree.parent(node) else {
            return (1, 1);
        };
        let tag = self.tree.tag_name(node);
        let group: Vec<NodeId> = self
            .tree
            .children(parent)
            .filter(|&child| match name_test {
                NameTest::Any => true,
                NameTest::Name(_) => self.tree.tag_name(child) == tag,
            })
            .collect();
        let position = group.iter().position(|&child| child == node).map_or(1, |i| i + 1);
        (position, group.len().max(1))
    }
}
