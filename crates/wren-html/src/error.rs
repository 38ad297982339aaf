//! Parser error type.

use std::path::PathBuf;

use thiserror::Error;
use wren_common::encoding::EncodingError;
use wren_dom::DomError;
use wren_xpath::XPathError;

/// Errors from parsing, validation and the query helpers on the parsers.
///
/// The lenient parser only returns I/O, encoding and wrapper errors for
/// parse calls; the three validation variants come from the validating
/// parser.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// A close tag matches no open tag.
    #[error("close tag </{tag}> matches no open tag")]
    InvalidCloseTag {
        /// The close tag's name.
        tag: String,
    },

    /// A close tag matches an open tag, but other tags are still open
    /// inside it.
    #[error("close tag </{tag}> found while {open_tags:?} are still open")]
    MissedCloseTag {
        /// The close tag's name.
        tag: String,
        /// Unclosed tags above the match, outermost first.
        open_tags: Vec<String>,
    },

    /// A parsed attribute name fails the attribute-name grammar.
    #[error("invalid attribute name {attribute:?} on <{tag}>")]
    InvalidAttributeName {
        /// Tag carrying the attribute.
        tag: String,
        /// The rejected name.
        attribute: String,
    },

    /// The input closes the synthetic wrapper itself, so it cannot be
    /// given a single root.
    #[error("input still has several roots after wrapping")]
    MultipleRoots,

    /// An HTML fragment contained no element.
    #[error("fragment contains no element")]
    EmptyFragment,

    /// A DOM operation failed.
    #[error(transparent)]
    Dom(#[from] DomError),

    /// An XPath query failed.
    #[error(transparent)]
    XPath(#[from] XPathError),

    /// The input bytes could not be decoded.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// The input file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl HtmlError {
    /// True for the errors only the validating parser raises.
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCloseTag { .. } | Self::MissedCloseTag { .. } | Self::InvalidAttributeName { .. }
        )
    }
}
