//! XPath error type.

use thiserror::Error;

/// Errors from compiling or evaluating an XPath expression.
///
/// Any error aborts the whole evaluation; there are no partial results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XPathError {
    /// The expression could not be parsed.
    #[error("XPath parse error: {message} (unparsed: {remainder:?})")]
    Parse {
        /// What went wrong.
        message: String,
        /// The text that was left when parsing stopped.
        remainder: String,
    },

    /// A predicate calls a function this engine does not know.
    #[error("unknown XPath function: {name}()")]
    UnknownFunction {
        /// Function name as written.
        name: String,
    },

    /// A type mismatch or missing operand while evaluating a predicate.
    #[error("XPath runtime error: {message}")]
    Runtime {
        /// What went wrong.
        message: String,
    },
}

impl XPathError {
    pub(crate) fn parse(message: impl Into<String>, remainder: &str) -> Self {
        Self::Parse {
            message: message.into(),
            remainder: remainder.to_string(),
        }
    }

    pub(crate) fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime {
            message: message.into(),
        }
    }

    /// True for errors detected while compiling (syntax, unknown function).
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::UnknownFunction { .. })
    }

    /// True for type errors and missing operands.
    #[must_use]
    pub const fn is_runtime_error(&self) -> bool {
        matches!(self, Self::Runtime { .. })
    }
}
