//! Forgiving HTML parsing into wren DOM trees.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer** ([`Tokenizer`]): turns markup into a flat stream of
//!   [`ParseEvent`]s (start/end tags, text, references, comments,
//!   declarations, processing instructions)
//!   - Tag and attribute names lowercased, attribute values decoded
//!   - `script`/`style` contents kept as raw text
//!
//! - **Tree builder** ([`TreeBuilder`]): folds events into a
//!   [`DomTree`](wren_dom::DomTree)
//!   - Lenient mode repairs stray and missing close tags with a warning
//!   - Validating mode reports them as [`HtmlError`]s
//!   - Void elements, preformatted text, comment and reference
//!     re-serialization
//!
//! - **Parsers**: [`HtmlParser`] (multi-root documents, fragments,
//!   encodings, XPath) and [`IndexedHtmlParser`] (id/name/class/tag and
//!   custom attribute maps via [`SearchIndex`])
//!
//! # Example
//!
//! ```
//! use wren_html::HtmlParser;
//!
//! let mut parser = HtmlParser::new();
//! parser.parse_str("<ul><li>one</li><li class=\"pick\">two</li></ul>").unwrap();
//!
//! let picked = parser.get_elements_by_class_name("pick");
//! assert_eq!(parser.tree().text(picked[0]), "two");
//!
//! let last = parser.get_elements_by_xpath("//li[last()]").unwrap();
//! assert_eq!(picked, last);
//! ```

/// Parser and index settings.
pub mod config;
/// Parser error type.
pub mod error;
/// Tree construction and the parser front ends.
pub mod parser;
/// Markup tokenizer.
pub mod tokenizer;

pub use config::{IndexConfig, ParserConfig};
pub use error::HtmlError;
pub use parser::{
    BuildError, BuilderMode, HtmlParser, IndexedHtmlParser, SearchIndex, TreeBuilder, normalize_text,
    strip_ie_conditionals,
};
pub use tokenizer::{ParseEvent, Tokenizer, TokenizerState, tokenize};
