//! Parser variant that keeps lookup maps alongside the tree.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::debug;
use wren_dom::{DomTree, NodeId, TagCollection};

use super::html_parser::HtmlParser;
use crate::config::{IndexConfig, ParserConfig};
use crate::error::HtmlError;

/// Lookup maps from attribute values to elements.
///
/// Entries are plain [`NodeId`]s, so a node removed behind the index's back
/// stays listed; lookups through [`IndexedHtmlParser`] drop entries whose
/// node is no longer attached.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    config: IndexConfig,
    ids: HashMap<String, NodeId>,
    names: HashMap<String, Vec<NodeId>>,
    class_names: HashMap<String, Vec<NodeId>>,
    tag_names: HashMap<String, Vec<NodeId>>,
    custom: HashMap<String, HashMap<String, Vec<NodeId>>>,
}

impl SearchIndex {
    /// An empty index that will maintain the maps `config` asks for.
    #[must_use]
    pub fn new(mut config: IndexConfig) -> Self {
        for attribute in &mut config.custom_attributes {
            attribute.make_ascii_lowercase();
        }
        Self {
            config,
            ..Self::default()
        }
    }

    /// Which maps are maintained.
    #[must_use]
    pub const fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Empty every map, keeping the configuration.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.names.clear();
        self.class_names.clear();
        self.tag_names.clear();
        self.custom.clear();
    }

    /// Rebuild every map from the whole document.
    pub fn rebuild(&mut self, tree: &DomTree) {
        self.clear();
        for id in tree.get_all_nodes().iter() {
            self.insert(tree, id);
        }
    }

    /// Add `id` and its descendants.
    pub fn insert_subtree(&mut self, tree: &DomTree, id: NodeId) {
        for node in tree.subtree(id) {
            if !tree.is_invisible_root(node) {
                self.insert(tree, node);
            }
        }
    }

    /// Forget `id` and its descendants. An `id` value owned by a removed
    /// node passes to the next attached element carrying it, if any.
    pub fn remove_subtree(&mut self, tree: &DomTree, id: NodeId) {
        let removed: Vec<NodeId> = tree.subtree(id).collect();
        for list in self
            .names
            .values_mut()
            .chain(self.class_names.values_mut())
            .chain(self.tag_names.values_mut())
            .chain(self.custom.values_mut().flat_map(HashMap::values_mut))
        {
            list.retain(|node| !removed.contains(node));
        }
        let orphaned: Vec<String> = self
            .ids
            .iter()
            .filter(|(_, node)| removed.contains(node))
            .map(|(value, _)| value.clone())
            .collect();
        for value in orphaned {
            let _ = self.ids.remove(&value);
            let successor = tree
                .get_elements_by_attr(None, "id", &value)
                .iter()
                .find(|node| !removed.contains(node));
            if let Some(node) = successor {
                let _ = self.ids.insert(value, node);
            }
        }
    }

    fn insert(&mut self, tree: &DomTree, id: NodeId) {
        if self.config.index_ids
            && let Some(value) = tree.attribute(id, "id")
            && !value.is_empty()
        {
            match self.ids.entry(value.into_owned()) {
                Entry::Vacant(slot) => {
                    let _ = slot.insert(id);
                }
                Entry::Occupied(mut slot) => {
                    let owner = *slot.get();
                    if owner != id && (!tree.contains(owner) || precedes(tree, id, owner)) {
                        let _ = slot.insert(id);
                    }
                }
            }
        }
        if self.config.index_names
            && let Some(value) = tree.attribute(id, "name")
            && !value.is_empty()
        {
            push_unique(self.names.entry(value.into_owned()).or_default(), id);
        }
        if self.config.index_class_names {
            for class_name in tree.class_list(id) {
                push_unique(self.class_names.entry(class_name).or_default(), id);
            }
        }
        if self.config.index_tag_names {
            push_unique(self.tag_names.entry(tree.tag_name(id).to_string()).or_default(), id);
        }
        for attribute in &self.config.custom_attributes {
            if let Some(value) = tree.attribute(id, attribute) {
                let by_value = self.custom.entry(attribute.clone()).or_default();
                push_unique(by_value.entry(value.into_owned()).or_default(), id);
            }
        }
    }

    // =========================================================================
    // Lookups (raw entries, possibly stale)
    // =========================================================================

    /// The element indexed for an `id` value: the first one in document
    /// order among the elements indexed with it.
    #[must_use]
    pub fn id(&self, value: &str) -> Option<NodeId> {
        self.ids.get(value).copied()
    }

    /// Elements indexed for a `name` value.
    #[must_use]
    pub fn names(&self, value: &str) -> &[NodeId] {
        self.names.get(value).map_or(&[], Vec::as_slice)
    }

    /// Elements indexed for a class token.
    #[must_use]
    pub fn class_names(&self, value: &str) -> &[NodeId] {
        self.class_names.get(value).map_or(&[], Vec::as_slice)
    }

    /// Elements indexed for a tag name.
    #[must_use]
    pub fn tag_names(&self, tag_name: &str) -> &[NodeId] {
        self.tag_names
            .get(&tag_name.to_ascii_lowercase())
            .map_or(&[], Vec::as_slice)
    }

    /// Elements indexed for a custom attribute value, or `None` when the
    /// attribute has no map.
    #[must_use]
    pub fn attribute(&self, name: &str, value: &str) -> Option<&[NodeId]> {
        self.custom
            .get(&name.to_ascii_lowercase())
            .map(|by_value| by_value.get(value).map_or(&[][..], Vec::as_slice))
    }

    /// True when `name` is one of the indexed custom attributes.
    #[must_use]
    pub fn has_attribute_index(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        self.config.custom_attributes.contains(&name)
    }
}

/// True when `a` comes before `b` in document order.
fn precedes(tree: &DomTree, a: NodeId, b: NodeId) -> bool {
    tree.get_all_nodes().iter().find(|&node| node == a || node == b) == Some(a)
}

fn push_unique(list: &mut Vec<NodeId>, id: NodeId) {
    if !list.contains(&id) {
        list.push(id);
    }
}

// =============================================================================
// IndexedHtmlParser
// =============================================================================

/// [`HtmlParser`] with a [`SearchIndex`] rebuilt after each parse.
///
/// Tree changes made through [`Self::append_node`] and
/// [`Self::remove_node`] keep the index current. Any other mutation (through
/// [`Self::parser_mut`]) needs a [`Self::reindex`] before indexed lookups see
/// it.
///
/// ```
/// use wren_html::{IndexConfig, IndexedHtmlParser};
///
/// let mut parser = IndexedHtmlParser::new(IndexConfig::default());
/// parser.parse_str(r#"<ul><li class="x">a</li><li class="x y">b</li></ul>"#).unwrap();
/// assert_eq!(parser.get_elements_by_class_name(None, "x", true).len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct IndexedHtmlParser {
    parser: HtmlParser,
    index: SearchIndex,
}

impl IndexedHtmlParser {
    /// A lenient parser maintaining the maps `config` asks for.
    #[must_use]
    pub fn new(config: IndexConfig) -> Self {
        Self::with_configs(ParserConfig::default(), config)
    }

    /// A parser with explicit parse and index settings.
    #[must_use]
    pub fn with_configs(parser_config: ParserConfig, index_config: IndexConfig) -> Self {
        Self {
            parser: HtmlParser::with_config(parser_config),
            index: SearchIndex::new(index_config),
        }
    }

    /// Parse `html` and rebuild the index.
    ///
    /// # Errors
    ///
    /// As [`HtmlParser::parse_str`]. The index is emptied on error.
    pub fn parse_str(&mut self, html: &str) -> Result<(), HtmlError> {
        self.index.clear();
        self.parser.parse_str(html)?;
        self.reindex();
        Ok(())
    }

    /// Decode, parse and index.
    ///
    /// # Errors
    ///
    /// As [`HtmlParser::parse_bytes`].
    pub fn parse_bytes(&mut self, bytes: &[u8]) -> Result<(), HtmlError> {
        self.index.clear();
        self.parser.parse_bytes(bytes)?;
        self.reindex();
        Ok(())
    }

    /// The wrapped parser.
    #[must_use]
    pub const fn parser(&self) -> &HtmlParser {
        &self.parser
    }

    /// The wrapped parser, for changes the index does not track.
    pub const fn parser_mut(&mut self) -> &mut HtmlParser {
        &mut self.parser
    }

    /// The document tree.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        self.parser.tree()
    }

    /// The index.
    #[must_use]
    pub const fn index(&self) -> &SearchIndex {
        &self.index
    }

    // =========================================================================
    // Index management
    // =========================================================================

    /// Start indexing a further attribute. Takes effect on the next
    /// [`Self::reindex`] or parse.
    pub fn add_index_on_attribute(&mut self, name: &str) {
        let name = name.to_ascii_lowercase();
        if !self.index.config.custom_attributes.contains(&name) {
            self.index.config.custom_attributes.push(name);
        }
    }

    /// Stop indexing an attribute and drop its map.
    pub fn remove_index_on_attribute(&mut self, name: &str) {
        let name = name.to_ascii_lowercase();
        self.index.config.custom_attributes.retain(|attribute| *attribute != name);
        let _ = self.index.custom.remove(&name);
    }

    /// Switch every map off. Lookups then walk the tree.
    pub fn disable_indexing(&mut self) {
        self.index = SearchIndex::new(IndexConfig::none());
    }

    /// Rebuild the index from the current tree.
    pub fn reindex(&mut self) {
        self.index.rebuild(self.parser.tree());
        debug!(
            ids = self.index.ids.len(),
            tags = self.index.tag_names.len(),
            "rebuilt search index"
        );
    }

    /// Replace the index settings and rebuild.
    pub fn reindex_with(&mut self, config: IndexConfig) {
        self.index = SearchIndex::new(config);
        self.reindex();
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Append `child` (with its subtree) under `parent`, indexing it if it
    /// ends up in the document.
    ///
    /// # Errors
    ///
    /// [`HtmlError::Dom`] when the DOM refuses the append.
    pub fn append_node(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, HtmlError> {
        let tree = self.parser.tree_mut();
        self.index.remove_subtree(tree, child);
        let _ = tree.append_child(parent, child)?;
        if tree.contains(child) {
            self.index.insert_subtree(tree, child);
        }
        Ok(child)
    }

    /// Detach `id` from the document and forget its subtree.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let tree = self.parser.tree_mut();
        self.index.remove_subtree(tree, id);
        tree.remove(id)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// First element with this `id`.
    #[must_use]
    pub fn get_element_by_id(&self, from: Option<NodeId>, value: &str, use_index: bool) -> Option<NodeId> {
        if !use_index || !self.index.config.index_ids {
            return self.tree().get_element_by_id(from, value);
        }
        self.index.id(value).filter(|&id| self.in_scope(from, id))
    }

    /// Elements whose `name` attribute is `value`.
    #[must_use]
    pub fn get_elements_by_name(&self, from: Option<NodeId>, value: &str, use_index: bool) -> TagCollection {
        if !use_index || !self.index.config.index_names {
            return self.tree().get_elements_by_name(from, value);
        }
        self.scoped(from, self.index.names(value))
    }

    /// Elements with this tag name.
    #[must_use]
    pub fn get_elements_by_tag_name(&self, from: Option<NodeId>, tag_name: &str, use_index: bool) -> TagCollection {
        if !use_index || !self.index.config.index_tag_names {
            return self.tree().get_elements_by_tag_name(from, tag_name);
        }
        self.scoped(from, self.index.tag_names(tag_name))
    }

    /// Elements carrying this class.
    #[must_use]
    pub fn get_elements_by_class_name(
        &self,
        from: Option<NodeId>,
        class_name: &str,
        use_index: bool,
    ) -> TagCollection {
        if !use_index || !self.index.config.index_class_names {
            return self.tree().get_elements_by_class_name(from, class_name);
        }
        self.scoped(from, self.index.class_names(class_name))
    }

    /// Elements whose attribute `name` equals `value`. Walks the tree when
    /// the attribute has no map.
    #[must_use]
    pub fn get_elements_by_attr(
        &self,
        from: Option<NodeId>,
        name: &str,
        value: &str,
        use_index: bool,
    ) -> TagCollection {
        match self.index.attribute(name, value) {
            Some(candidates) if use_index => self.scoped(from, candidates),
            _ => self.tree().get_elements_by_attr(from, name, value),
        }
    }

    /// Evaluate an XPath expression over the document.
    ///
    /// # Errors
    ///
    /// As [`HtmlParser::get_elements_by_xpath`].
    pub fn get_elements_by_xpath(&self, xpath: &str) -> Result<TagCollection, HtmlError> {
        self.parser.get_elements_by_xpath(xpath)
    }

    fn in_scope(&self, from: Option<NodeId>, id: NodeId) -> bool {
        let tree = self.tree();
        tree.contains(id) && from.is_none_or(|ancestor| tree.is_ancestor_of(ancestor, id))
    }

    fn scoped(&self, from: Option<NodeId>, candidates: &[NodeId]) -> TagCollection {
        candidates
            .iter()
            .copied()
            .filter(|&id| self.in_scope(from, id))
            .collect()
    }
}
