//! Parser and index settings.

use wren_common::encoding::DEFAULT_ENCODING;

/// Settings for [`HtmlParser`](crate::HtmlParser).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Encoding label used by [`HtmlParser::parse_bytes`](crate::HtmlParser::parse_bytes)
    /// when the input has no byte order mark.
    pub encoding: String,
    /// Raise structural and attribute-name errors instead of recovering.
    pub validating: bool,
    /// Remove `<!--[if ...]> ... <![endif]-->` blocks before tokenizing.
    pub strip_ie_conditionals: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            encoding: DEFAULT_ENCODING.to_string(),
            validating: false,
            strip_ie_conditionals: true,
        }
    }
}

impl ParserConfig {
    /// Return a copy with a different input encoding.
    #[must_use]
    pub fn with_encoding(mut self, label: &str) -> Self {
        self.encoding = label.to_string();
        self
    }

    /// Return a copy with validation switched on or off.
    #[must_use]
    pub const fn with_validation(mut self, validating: bool) -> Self {
        self.validating = validating;
        self
    }
}

/// Which lookups [`IndexedHtmlParser`](crate::IndexedHtmlParser) keeps
/// maps for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Map `id` values to their first element.
    pub index_ids: bool,
    /// Map `name` values to elements.
    pub index_names: bool,
    /// Map class tokens to elements.
    pub index_class_names: bool,
    /// Map tag names to elements.
    pub index_tag_names: bool,
    /// Further attributes to map by value (lowercase names).
    pub custom_attributes: Vec<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            index_ids: true,
            index_names: true,
            index_class_names: true,
            index_tag_names: true,
            custom_attributes: Vec::new(),
        }
    }
}

impl IndexConfig {
    /// A configuration with every map switched off.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            index_ids: false,
            index_names: false,
            index_class_names: false,
            index_tag_names: false,
            custom_attributes: Vec::new(),
        }
    }
}
