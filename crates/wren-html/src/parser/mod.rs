//! Tree construction and the parser front ends.

/// Event-driven tree builder.
pub mod builder;
/// IE conditional comment stripping.
pub mod conditional;
/// Document parser.
pub mod html_parser;
/// Parser with lookup indexes.
pub mod indexed;

pub use builder::{BuildError, BuilderMode, TreeBuilder, normalize_text};
pub use conditional::strip_ie_conditionals;
pub use html_parser::HtmlParser;
pub use indexed::{IndexedHtmlParser, SearchIndex};
