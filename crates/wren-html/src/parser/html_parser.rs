//! The document parser.

use std::path::Path;

use tracing::debug;
use wren_common::encoding::decode;
use wren_dom::{Block, DomTree, FindQuery, INVISIBLE_ROOT_TAG, NodeId, TagCollection};
use wren_xpath::XPathQuery;

use super::builder::{BuildError, BuilderMode, TreeBuilder};
use super::conditional::strip_ie_conditionals;
use crate::config::ParserConfig;
use crate::error::HtmlError;
use crate::tokenizer::{ParseEvent, tokenize};

/// Parses HTML into a [`DomTree`] and answers queries on it.
///
/// Input with several top-level nodes (or text beside the root) is
/// transparently rebuilt inside an invisible `xxxblank` wrapper;
/// [`Self::get_root_nodes`] hides it again.
///
/// ```
/// use wren_html::HtmlParser;
///
/// let mut parser = HtmlParser::new();
/// parser.parse_str(r#"<div id="one">A</div><div id="two">B</div>"#).unwrap();
/// assert_eq!(parser.get_root_nodes().len(), 2);
/// ```
#[derive(Debug)]
pub struct HtmlParser {
    tree: DomTree,
    config: ParserConfig,
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlParser {
    /// A lenient parser with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// A parser with explicit settings.
    #[must_use]
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            tree: DomTree::new(),
            config,
        }
    }

    /// A parser that raises on mismatched close tags and bad attribute
    /// names instead of repairing them.
    #[must_use]
    pub fn validating() -> Self {
        Self::with_config(ParserConfig::default().with_validation(true))
    }

    /// Current settings.
    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    const fn mode(&self) -> BuilderMode {
        if self.config.validating {
            BuilderMode::Validating
        } else {
            BuilderMode::Lenient
        }
    }

    // =========================================================================
    // Parsing
    // =========================================================================

    /// Replace the document with the parse of `html`.
    ///
    /// # Errors
    ///
    /// Validation errors in validating mode; [`HtmlError::MultipleRoots`]
    /// if the input closes the wrapper element itself.
    pub fn parse_str(&mut self, html: &str) -> Result<(), HtmlError> {
        self.reset();
        let html = if self.config.strip_ie_conditionals {
            strip_ie_conditionals(html)
        } else {
            html.into()
        };
        let mode = self.mode();
        match build(&mut self.tree, tokenize(&html), mode) {
            Ok(()) => Ok(()),
            Err(BuildError::Invalid(error)) => Err(error),
            Err(BuildError::MultipleRoots) => {
                debug!("input has several top-level nodes; rebuilding inside <{INVISIBLE_ROOT_TAG}>");
                self.reset();
                Ok(build(&mut self.tree, wrapped_events(&html), mode)?)
            }
        }
    }

    /// Decode `bytes` with the configured encoding (a byte order mark
    /// wins) and parse them.
    ///
    /// # Errors
    ///
    /// [`HtmlError::Encoding`] for an unknown label or undecodable bytes,
    /// then as [`Self::parse_str`].
    pub fn parse_bytes(&mut self, bytes: &[u8]) -> Result<(), HtmlError> {
        let html = decode(bytes, &self.config.encoding)?;
        self.parse_str(&html)
    }

    /// Read and parse a file.
    ///
    /// # Errors
    ///
    /// [`HtmlError::Io`] when the file cannot be read, then as
    /// [`Self::parse_bytes`].
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<(), HtmlError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| HtmlError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_bytes(&bytes)
    }

    /// Drop the current document.
    pub fn reset(&mut self) {
        self.tree = DomTree::new();
    }

    // =========================================================================
    // Document access
    // =========================================================================

    /// The document tree.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// The document tree, for mutation.
    pub const fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Give up the parser and keep the tree.
    #[must_use]
    pub fn into_tree(self) -> DomTree {
        self.tree
    }

    /// The structural root, which may be the invisible wrapper.
    #[must_use]
    pub const fn get_root(&self) -> Option<NodeId> {
        self.tree.root()
    }

    /// The document's real top-level elements.
    #[must_use]
    pub fn get_root_nodes(&self) -> Vec<NodeId> {
        self.tree.get_root_nodes()
    }

    /// Every element in document order.
    #[must_use]
    pub fn get_all_nodes(&self) -> TagCollection {
        self.tree.get_all_nodes()
    }

    /// Text of the first declaration, such as `DOCTYPE html`.
    #[must_use]
    pub fn get_doctype(&self) -> Option<&str> {
        self.tree.doctype()
    }

    /// The whole document serialized back to HTML.
    #[must_use]
    pub fn get_html(&self) -> String {
        self.tree.get_html()
    }

    /// Indented outline of every top-level element.
    #[must_use]
    pub fn get_formatted_html(&self) -> String {
        self.get_root_nodes()
            .into_iter()
            .map(|id| self.tree.dump_tree(id))
            .collect()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// First element with this `id`.
    #[must_use]
    pub fn get_element_by_id(&self, id_value: &str) -> Option<NodeId> {
        self.tree.get_element_by_id(None, id_value)
    }

    /// Elements with this `name` attribute.
    #[must_use]
    pub fn get_elements_by_name(&self, name: &str) -> TagCollection {
        self.tree.get_elements_by_name(None, name)
    }

    /// Elements with this tag name.
    #[must_use]
    pub fn get_elements_by_tag_name(&self, tag_name: &str) -> TagCollection {
        self.tree.get_elements_by_tag_name(None, tag_name)
    }

    /// Elements carrying this class.
    #[must_use]
    pub fn get_elements_by_class_name(&self, class_name: &str) -> TagCollection {
        self.tree.get_elements_by_class_name(None, class_name)
    }

    /// Elements whose attribute equals `value`.
    #[must_use]
    pub fn get_elements_by_attr(&self, name: &str, value: &str) -> TagCollection {
        self.tree.get_elements_by_attr(None, name, value)
    }

    /// Elements matching a predicate.
    #[must_use]
    pub fn get_elements_custom_filter<F>(&self, predicate: F) -> TagCollection
    where
        F: FnMut(&DomTree, NodeId) -> bool,
    {
        self.tree.get_elements_custom_filter(None, predicate)
    }

    /// Elements matching every criterion of `query`.
    #[must_use]
    pub fn find(&self, query: &FindQuery) -> TagCollection {
        self.tree.find(None, query)
    }

    /// Evaluate an XPath expression from the top-level elements.
    ///
    /// # Errors
    ///
    /// [`HtmlError::XPath`] on compile or runtime errors.
    pub fn get_elements_by_xpath(&self, xpath: &str) -> Result<TagCollection, HtmlError> {
        Ok(self.tree.get_elements_by_xpath(None, xpath)?)
    }

    // =========================================================================
    // Fragments
    // =========================================================================

    /// Parse a fragment and return its first element, detached, in this
    /// parser's tree.
    ///
    /// # Errors
    ///
    /// [`HtmlError::EmptyFragment`] if the fragment has no element, or any
    /// parse error.
    pub fn create_element_from_html(&mut self, html: &str) -> Result<NodeId, HtmlError> {
        self.create_elements_from_html(html)?
            .into_iter()
            .next()
            .ok_or(HtmlError::EmptyFragment)
    }

    /// Parse a fragment and return all its top-level elements, detached,
    /// in this parser's tree. Text between them is discarded.
    ///
    /// # Errors
    ///
    /// As [`Self::parse_str`].
    pub fn create_elements_from_html(&mut self, html: &str) -> Result<Vec<NodeId>, HtmlError> {
        let (fragment, wrapper) = self.parse_fragment(html)?;
        Ok(fragment
            .children(wrapper)
            .map(|child| self.tree.import_node(&fragment, child))
            .collect())
    }

    /// Replace the content of `id` with the parse of `html`.
    ///
    /// # Errors
    ///
    /// Parse errors, or [`HtmlError::Dom`] if `id` is a void element.
    pub fn set_inner_html(&mut self, id: NodeId, html: &str) -> Result<(), HtmlError> {
        let (fragment, wrapper) = self.parse_fragment(html)?;
        self.tree.set_text_content(id, "")?;
        for block in fragment.blocks(wrapper) {
            match block {
                Block::Text(text) => self.tree.append_text(id, text)?,
                Block::Tag(child) => {
                    let copy = self.tree.import_node(&fragment, *child);
                    let _ = self.tree.append_child(id, copy)?;
                }
            }
        }
        Ok(())
    }

    /// Build `html` inside the wrapper so that any mix of elements and text
    /// parses, and return the scratch tree with its wrapper node.
    fn parse_fragment(&self, html: &str) -> Result<(DomTree, NodeId), HtmlError> {
        let mut fragment = DomTree::new();
        build(&mut fragment, wrapped_events(html), self.mode())?;
        let wrapper = fragment.root().ok_or(HtmlError::EmptyFragment)?;
        Ok((fragment, wrapper))
    }
}

/// Events for `html` between a wrapper start and end tag. Wrapping at the
/// event level keeps an unclosed `script` from swallowing the end tag.
fn wrapped_events(html: &str) -> Vec<ParseEvent> {
    let mut events = vec![ParseEvent::StartTag {
        name: INVISIBLE_ROOT_TAG.to_string(),
        attributes: Vec::new(),
        self_closing: false,
    }];
    events.extend(tokenize(html));
    events.push(ParseEvent::EndTag {
        name: INVISIBLE_ROOT_TAG.to_string(),
    });
    events
}

fn build(tree: &mut DomTree, events: Vec<ParseEvent>, mode: BuilderMode) -> Result<(), BuildError> {
    TreeBuilder::new(tree, mode).build(events)
}
