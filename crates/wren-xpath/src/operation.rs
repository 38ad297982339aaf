//! Compiled path operations.

use std::fmt;

use strum_macros::{Display, EnumString};

use crate::body::BodyExpr;

/// Traversal directions accepted before `::` in a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum Axis {
    /// `child::`
    #[strum(serialize = "child")]
    Child,
    /// `descendant::`
    #[strum(serialize = "descendant")]
    Descendant,
    /// `descendant-or-self::`
    #[strum(serialize = "descendant-or-self")]
    DescendantOrSelf,
    /// `self::`
    #[strum(serialize = "self")]
    SelfAxis,
    /// `parent::`
    #[strum(serialize = "parent")]
    Parent,
    /// `ancestor::`
    #[strum(serialize = "ancestor")]
    Ancestor,
    /// `ancestor-or-self::`
    #[strum(serialize = "ancestor-or-self")]
    AncestorOrSelf,
}

/// Which tag names a step accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameTest {
    /// `*` or `node()`
    Any,
    /// A lowercased tag name.
    Name(String),
}

impl NameTest {
    /// Does a node with this tag name pass?
    #[must_use]
    pub fn matches(&self, tag_name: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Name(name) => name.eq_ignore_ascii_case(tag_name),
        }
    }
}

impl fmt::Display for NameTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// One `/name` or `//axis::name` step.
///
/// The step's nodes are found by taking the context set (its
/// descendant-or-self closure when `multi_level` is set) and following
/// `axis` from each node. A first step written with `/` or `//` works from
/// a virtual document node whose children are the starting nodes; a
/// relative first step (`.`, `..`, `parent::p`) follows its axis from the
/// starting nodes themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagStep {
    /// Direction to follow; plain steps use [`Axis::Child`].
    pub axis: Axis,
    /// Accepted tag names.
    pub name: NameTest,
    /// True for the first step of the expression.
    pub first: bool,
    /// True when the step was written with `//`.
    pub multi_level: bool,
    /// True for a first step written without a leading `/` that names an
    /// axis or is `.`/`..`. A bare `name` first step is read as `/name`.
    pub relative: bool,
}

impl fmt::Display for TagStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.relative {
            f.write_str(if self.multi_level { "//" } else { "/" })?;
        }
        if self.axis != Axis::Child {
            write!(f, "{}::", self.axis)?;
        }
        write!(f, "{}", self.name)
    }
}

/// An entry in a compiled expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Move to a new node set.
    Step(TagStep),
    /// Filter the current node set.
    Predicate(BodyExpr),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Step(step) => write!(f, "{step}"),
            Self::Predicate(body) => write!(f, "[{body}]"),
        }
    }
}
