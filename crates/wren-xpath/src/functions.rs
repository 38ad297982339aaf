//! Built-in predicate functions.

use std::str::FromStr;

use strum_macros::{Display, EnumString};

use crate::error::XPathError;
use crate::value::BodyValue;

/// Functions callable inside a predicate body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum Function {
    /// `last()`: size of the node's sibling group.
    #[strum(serialize = "last")]
    Last,
    /// `position()`: 1-based index within the sibling group.
    #[strum(serialize = "position")]
    Position,
    /// `text()`: the node's own text.
    #[strum(serialize = "text")]
    Text,
    /// `normalize-space([s])`
    #[strum(serialize = "normalize-space")]
    NormalizeSpace,
    /// `concat(a, b, ...)`
    #[strum(serialize = "concat")]
    Concat,
    /// `contains(haystack, needle)`
    #[strum(serialize = "contains")]
    Contains,
    /// `starts-with(s, prefix)`
    #[strum(serialize = "starts-with")]
    StartsWith,
    /// `string-length([s])`
    #[strum(serialize = "string-length")]
    StringLength,
    /// `not(b)`
    #[strum(serialize = "not")]
    Not,
    /// `true()`
    #[strum(serialize = "true")]
    True,
    /// `false()`
    #[strum(serialize = "false")]
    False,
    /// `name()`: the node's tag name.
    #[strum(serialize = "name")]
    Name,
}

/// What a function may read from the node under test.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeFacts<'a> {
    /// 1-based position in the sibling group.
    pub position: usize,
    /// Size of the sibling group.
    pub last: usize,
    /// The node's own text.
    pub text: &'a str,
    /// The node's tag name.
    pub name: &'a str,
}

impl Function {
    /// Look a function up by the name written in the expression.
    ///
    /// # Errors
    ///
    /// [`XPathError::UnknownFunction`] for names outside the built-in set.
    pub fn lookup(name: &str) -> Result<Self, XPathError> {
        Self::from_str(name).map_err(|_| XPathError::UnknownFunction {
            name: name.to_string(),
        })
    }

    /// Allowed argument counts, inclusive. `None` as the upper bound means variadic.
    #[must_use]
    pub const fn arity(self) -> (usize, Option<usize>) {
        match self {
            Self::Last | Self::Position | Self::Text | Self::True | Self::False | Self::Name => {
                (0, Some(0))
            }
            Self::NormalizeSpace | Self::StringLength => (0, Some(1)),
            Self::Not => (1, Some(1)),
            Self::Contains | Self::StartsWith => (2, Some(2)),
            Self::Concat => (2, None),
        }
    }

    /// True when the result depends on the node under test, so a call with
    /// constant arguments still cannot be folded.
    #[must_use]
    pub const fn reads_node(self, argc: usize) -> bool {
        match self {
            Self::Last | Self::Position | Self::Text | Self::Name => true,
            Self::NormalizeSpace | Self::StringLength => argc == 0,
            _ => false,
        }
    }

    /// Check an argument count against [`Self::arity`].
    ///
    /// # Errors
    ///
    /// [`XPathError::Parse`] with `remainder` as the unparsed text.
    pub fn check_arity(self, argc: usize, remainder: &str) -> Result<(), XPathError> {
        let (min, max) = self.arity();
        if argc < min || max.is_some_and(|max| argc > max) {
            let expected = match max {
                Some(max) if max == min => format!("{min}"),
                Some(max) => format!("{min} to {max}"),
                None => format!("at least {min}"),
            };
            return Err(XPathError::parse(
                format!("{self}() takes {expected} argument(s), got {argc}"),
                remainder,
            ));
        }
        Ok(())
    }

    /// Call the function with evaluated arguments.
    #[must_use]
    pub fn call(self, args: &[BodyValue], node: &NodeFacts<'_>) -> BodyValue {
        let arg_or_text = |index: usize| {
            args.get(index)
                .map_or_else(|| node.text.to_string(), BodyValue::as_string)
        };
        match self {
            Self::Last => BodyValue::Number(node.last as f64),
            Self::Position => BodyValue::Number(node.position as f64),
            Self::Text => BodyValue::Str(node.text.to_string()),
            Self::Name => BodyValue::Str(node.name.to_string()),
            Self::NormalizeSpace => BodyValue::Str(
                arg_or_text(0)
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            Self::StringLength => BodyValue::Number(arg_or_text(0).chars().count() as f64),
            Self::Concat => BodyValue::Str(args.iter().map(BodyValue::as_string).collect()),
            Self::Contains => BodyValue::Boolean(string_pair(args, |a, b| a.contains(b))),
            Self::StartsWith => BodyValue::Boolean(string_pair(args, |a, b| a.starts_with(b))),
            Self::Not => BodyValue::Boolean(!args.first().is_some_and(BodyValue::to_boolean)),
            Self::True => BodyValue::Boolean(true),
            Self::False => BodyValue::Boolean(false),
        }
    }
}

fn string_pair(args: &[BodyValue], test: impl Fn(&str, &str) -> bool) -> bool {
    match args {
        [BodyValue::Null, _] | [_, BodyValue::Null] => false,
        [a, b] => test(&a.as_string(), &b.as_string()),
        _ => false,
    }
}
