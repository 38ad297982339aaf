//! XPath-subset queries over wren DOM trees.
//!
//! Supported grammar:
//!
//! - **Steps**: `/name`, `//name`, `*`, `.`, `..`, and the axes `child`,
//!   `descendant`, `descendant-or-self`, `self`, `parent`, `ancestor`,
//!   `ancestor-or-self` (`//ancestor::div`, `/child::li::node()`)
//! - **Predicates**: `[...]` after any step, chainable, holding `@attr`,
//!   string and number literals, `= != < <= > >=`, `+ - * div mod`, `||`,
//!   `and`/`or`, parentheses and the functions in [`Function`]
//!
//! A predicate that reduces to a number keeps the node at that 1-based
//! position among its same-tag siblings; a boolean keeps the node when
//! true; a string (such as a present attribute) keeps it; an absent
//! attribute drops it.
//!
//! # Example
//!
//! ```
//! use wren_dom::DomTree;
//! use wren_xpath::XPathQuery;
//!
//! let mut tree = DomTree::new();
//! let ul = tree.create_element("ul");
//! tree.set_root(Some(ul));
//! for text in ["A", "B", "C"] {
//!     let li = tree.create_element("li");
//!     tree.append_text(li, text).unwrap();
//!     tree.append_child(ul, li).unwrap();
//! }
//!
//! let found = tree.get_elements_by_xpath(None, "//li[last()]").unwrap();
//! assert_eq!(tree.text(found[0]), "C");
//! ```
//!
//! # Threads
//!
//! Queries only read the tree, so several threads may query one tree at
//! once. Mutating a tree while another thread queries it needs outside
//! synchronization.

/// Predicate body parsing and evaluation.
pub mod body;
/// Compiled expression cache.
pub mod cache;
/// Path compiler.
pub mod compiler;
/// Evaluation settings.
pub mod config;
/// XPath error type.
pub mod error;
/// Evaluator.
pub mod eval;
/// Built-in functions.
pub mod functions;
/// Step and predicate operations.
pub mod operation;
/// Predicate values and operators.
pub mod value;

use tracing::debug;
use wren_dom::{DomTree, NodeId, TagCollection};

pub use body::BodyExpr;
pub use cache::{DEFAULT_CAPACITY, DEFAULT_EVICT_BATCH, ExpressionCache};
pub use config::XPathConfig;
pub use error::XPathError;
pub use eval::XPathEvaluator;
pub use functions::{Function, NodeFacts};
pub use operation::{Axis, NameTest, Operation, TagStep};
pub use value::{BinaryOp, BodyValue};

/// A compiled expression.
#[derive(Debug, Clone, PartialEq)]
pub struct XPathExpression {
    source: String,
    operations: Vec<Operation>,
}

impl XPathExpression {
    /// Compile `source`.
    ///
    /// # Errors
    ///
    /// [`XPathError::Parse`], [`XPathError::UnknownFunction`], or
    /// [`XPathError::Runtime`] for an operator missing an operand.
    pub fn compile(source: &str, config: &XPathConfig) -> Result<Self, XPathError> {
        let operations = compiler::compile(source)?;
        if config.debug {
            for (index, operation) in operations.iter().enumerate() {
                debug!(expression = source, index, operation = %operation, "compiled XPath operation");
            }
        }
        Ok(Self {
            source: source.to_string(),
            operations,
        })
    }

    /// The text this was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Steps and predicates in evaluation order.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }
}

/// Evaluate `xpath` with `start` as the top-level nodes, compiling through
/// the shared cache.
///
/// # Errors
///
/// Any compile or runtime [`XPathError`].
pub fn evaluate(tree: &DomTree, start: &TagCollection, xpath: &str) -> Result<TagCollection, XPathError> {
    evaluate_with(tree, start, xpath, &XPathConfig::default())
}

/// [`evaluate`] with explicit settings.
///
/// # Errors
///
/// Any compile or runtime [`XPathError`].
pub fn evaluate_with(
    tree: &DomTree,
    start: &TagCollection,
    xpath: &str,
    config: &XPathConfig,
) -> Result<TagCollection, XPathError> {
    let evaluator = XPathEvaluator::new(tree, config);
    if config.use_cache {
        let expr = ExpressionCache::shared().get_or_compile(xpath, config)?;
        evaluator.evaluate(&expr, start)
    } else {
        evaluator.evaluate(&XPathExpression::compile(xpath, config)?, start)
    }
}

/// XPath lookups on a [`DomTree`].
pub trait XPathQuery {
    /// Evaluate from the document's top-level elements, or from `from`.
    ///
    /// # Errors
    ///
    /// Any compile or runtime [`XPathError`].
    fn get_elements_by_xpath(&self, from: Option<NodeId>, xpath: &str) -> Result<TagCollection, XPathError>;

    /// Evaluate with the members of `collection` as the top-level nodes.
    ///
    /// # Errors
    ///
    /// Any compile or runtime [`XPathError`].
    fn get_elements_by_xpath_in(
        &self,
        collection: &TagCollection,
        xpath: &str,
    ) -> Result<TagCollection, XPathError>;
}

impl XPathQuery for DomTree {
    fn get_elements_by_xpath(&self, from: Option<NodeId>, xpath: &str) -> Result<TagCollection, XPathError> {
        let start = from.map_or_else(
            || TagCollection::from_nodes(self.get_root_nodes()),
            |node| TagCollection::from_nodes([node]),
        );
        evaluate(self, &start, xpath)
    }

    fn get_elements_by_xpath_in(
        &self,
        collection: &TagCollection,
        xpath: &str,
    ) -> Result<TagCollection, XPathError> {
        evaluate(self, collection, xpath)
    }
}
