//! Path compiler.
//!
//! Alternates between reading a tag step (`/name`, `//axis::name`) and
//! reading any number of bracketed predicate bodies that follow it.

use std::str::FromStr;

use crate::body::BodyExpr;
use crate::error::XPathError;
use crate::operation::{Axis, NameTest, Operation, TagStep};

/// Compile an expression into its operation list.
///
/// # Errors
///
/// See [`BodyExpr::parse`]; path syntax errors are [`XPathError::Parse`].
pub fn compile(source: &str) -> Result<Vec<Operation>, XPathError> {
    let source = source.trim();
    if source.is_empty() {
        return Err(XPathError::parse("empty expression", source));
    }

    let bytes = source.as_bytes();
    let mut operations = Vec::new();
    let mut pos = 0;
    let mut first = true;

    while pos < bytes.len() {
        let unanchored = first && bytes[pos] != b'/';
        let multi_level = match (bytes[pos], bytes.get(pos + 1)) {
            (b'/', Some(b'/')) => {
                pos += 2;
                true
            }
            (b'/', _) => {
                pos += 1;
                false
            }
            (b'[', _) => {
                return Err(XPathError::parse("predicate without a tag step", &source[pos..]));
            }
            _ if first => false,
            _ => return Err(XPathError::parse("expected '/'", &source[pos..])),
        };

        let step_start = pos;
        while pos < bytes.len() && bytes[pos] != b'/' && bytes[pos] != b'[' {
            pos += 1;
        }
        let step = parse_step(&source[step_start..pos], &source[step_start..], first, multi_level, unanchored)?;
        operations.push(Operation::Step(step));

        while pos < bytes.len() && bytes[pos] == b'[' {
            let close = matching_bracket(source, pos)?;
            let body = BodyExpr::parse(&source[pos + 1..close], &source[close..])?;
            operations.push(Operation::Predicate(body));
            pos = close + 1;
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
        }
        first = false;
    }
    Ok(operations)
}

/// `unanchored` is set for a first step with no leading `/`; such a step
/// only counts as relative when it names an axis or is `.`/`..`.
fn parse_step(
    text: &str,
    remainder: &str,
    first: bool,
    multi_level: bool,
    unanchored: bool,
) -> Result<TagStep, XPathError> {
    let text = text.trim();
    let step = |axis, name, relative| TagStep {
        axis,
        name,
        first,
        multi_level,
        relative,
    };
    match text {
        "" => return Err(XPathError::parse("expected a tag name", remainder)),
        "." => return Ok(step(Axis::SelfAxis, NameTest::Any, unanchored)),
        ".." => return Ok(step(Axis::Parent, NameTest::Any, unanchored)),
        _ => {}
    }

    let (axis, rest, relative) = match text.split_once("::") {
        Some((prefix, rest)) => match Axis::from_str(prefix.trim()) {
            Ok(axis) => (axis, rest.trim(), unanchored),
            Err(_) if rest.trim() == "node()" => (Axis::Child, text, false),
            Err(_) => {
                return Err(XPathError::parse(format!("unknown axis '{}'", prefix.trim()), remainder));
            }
        },
        None => (Axis::Child, text, false),
    };
    // `name::node()` style suffixes do not narrow the match.
    let name = rest.split_once("::").map_or(rest, |(name, _)| name).trim();

    let name = match name {
        "*" | "node()" => NameTest::Any,
        name if is_name(name) => NameTest::Name(name.to_ascii_lowercase()),
        "" => return Err(XPathError::parse("expected a tag name", remainder)),
        _ => return Err(XPathError::parse(format!("invalid tag name '{name}'"), remainder)),
    };
    Ok(step(axis, name, relative))
}

fn is_name(text: &str) -> bool {
    !text.is_empty()
        && text
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.'))
}

/// Index of the `]` closing the `[` at `open`, skipping quoted text and
/// nested brackets.
fn matching_bracket(source: &str, open: usize) -> Result<usize, XPathError> {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    for (i, b) in source.bytes().enumerate().skip(open) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'[') => depth += 1,
            (None, b']') => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err(XPathError::parse("unterminated predicate", &source[open..]))
}
