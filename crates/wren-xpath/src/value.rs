//! Predicate values and operator semantics.
//!
//! Predicate bodies work on four kinds of value. `Null` stands for an
//! attribute that is not set: comparisons with it are false and math with
//! it stays `Null`.

use std::fmt;

use strum_macros::Display;

use crate::error::XPathError;

/// A value produced inside a predicate body.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyValue {
    /// A string.
    Str(String),
    /// An IEEE 754 double.
    Number(f64),
    /// A boolean.
    Boolean(bool),
    /// An absent attribute.
    Null,
}

impl BodyValue {
    /// Numeric reading: numbers as-is, strings that parse as a decimal
    /// number (after trimming), nothing else.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Str(s) => s.trim().parse().ok(),
            Self::Boolean(_) | Self::Null => None,
        }
    }

    /// String reading; `Null` reads as the empty string.
    #[must_use]
    pub fn as_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// Truth value used by `not()`: empty strings, zero, NaN and `Null` are false.
    #[must_use]
    pub fn to_boolean(&self) -> bool {
        match self {
            Self::Boolean(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Str(s) => !s.is_empty(),
            Self::Null => false,
        }
    }
}

impl fmt::Display for BodyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{}", format_number(*n)),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Null => f.write_str("null"),
        }
    }
}

/// Integral values print without a fractional part (`2`, not `2.0`).
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Binary operators, loosest-binding last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BinaryOp {
    /// `*`
    #[strum(serialize = "*")]
    Mul,
    /// `div`
    #[strum(serialize = "div")]
    Div,
    /// `mod`
    #[strum(serialize = "mod")]
    Mod,
    /// `+`
    #[strum(serialize = "+")]
    Add,
    /// `-`
    #[strum(serialize = "-")]
    Sub,
    /// `||` (string concatenation)
    #[strum(serialize = "||")]
    Concat,
    /// `=`
    #[strum(serialize = "=")]
    Eq,
    /// `!=`
    #[strum(serialize = "!=")]
    Ne,
    /// `<`
    #[strum(serialize = "<")]
    Lt,
    /// `<=`
    #[strum(serialize = "<=")]
    Le,
    /// `>`
    #[strum(serialize = ">")]
    Gt,
    /// `>=`
    #[strum(serialize = ">=")]
    Ge,
    /// `and`
    #[strum(serialize = "and")]
    And,
    /// `or`
    #[strum(serialize = "or")]
    Or,
}

impl BinaryOp {
    /// Binding strength; higher binds tighter.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Mul | Self::Div | Self::Mod => 6,
            Self::Add | Self::Sub => 5,
            Self::Concat => 4,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge => 3,
            Self::And => 2,
            Self::Or => 1,
        }
    }

    /// Apply the operator to two evaluated operands.
    ///
    /// # Errors
    ///
    /// [`XPathError::Runtime`] when ordering or math operands are not
    /// numeric, or when `and`/`or` get non-boolean operands.
    pub fn apply(self, left: &BodyValue, right: &BodyValue) -> Result<BodyValue, XPathError> {
        match self {
            Self::Eq | Self::Ne => Ok(BodyValue::Boolean(equality(self, left, right))),
            Self::Lt | Self::Le | Self::Gt | Self::Ge => ordering(self, left, right),
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Mod => math(self, left, right),
            Self::Concat => Ok(BodyValue::Str(left.as_string() + &right.as_string())),
            Self::And | Self::Or => {
                let (BodyValue::Boolean(l), BodyValue::Boolean(r)) = (left, right) else {
                    return Err(XPathError::runtime(format!(
                        "'{self}' needs boolean operands, got {} and {}",
                        describe(left),
                        describe(right)
                    )));
                };
                Ok(BodyValue::Boolean(if self == Self::And { *l && *r } else { *l || *r }))
            }
        }
    }
}

fn describe(value: &BodyValue) -> String {
    match value {
        BodyValue::Str(s) => format!("string {s:?}"),
        BodyValue::Number(n) => format!("number {}", format_number(*n)),
        BodyValue::Boolean(b) => format!("boolean {b}"),
        BodyValue::Null => "null".to_string(),
    }
}

fn equality(op: BinaryOp, left: &BodyValue, right: &BodyValue) -> bool {
    if *left == BodyValue::Null || *right == BodyValue::Null {
        return false;
    }
    let equal = match (left, right) {
        (BodyValue::Boolean(l), BodyValue::Boolean(r)) => l == r,
        _ => match (left.as_number(), right.as_number()) {
            (Some(l), Some(r)) => (l - r).abs() < f64::EPSILON,
            _ => left.as_string() == right.as_string(),
        },
    };
    if op == BinaryOp::Eq { equal } else { !equal }
}

fn ordering(op: BinaryOp, left: &BodyValue, right: &BodyValue) -> Result<BodyValue, XPathError> {
    if *left == BodyValue::Null || *right == BodyValue::Null {
        return Ok(BodyValue::Boolean(false));
    }
    let (Some(l), Some(r)) = (left.as_number(), right.as_number()) else {
        return Err(XPathError::runtime(format!(
            "'{op}' needs numeric operands, got {} and {}",
            describe(left),
            describe(right)
        )));
    };
    Ok(BodyValue::Boolean(match op {
        BinaryOp::Lt => l < r,
        BinaryOp::Le => l <= r,
        BinaryOp::Gt => l > r,
        _ => l >= r,
    }))
}

fn math(op: BinaryOp, left: &BodyValue, right: &BodyValue) -> Result<BodyValue, XPathError> {
    if *left == BodyValue::Null || *right == BodyValue::Null {
        return Ok(BodyValue::Null);
    }
    let (Some(l), Some(r)) = (left.as_number(), right.as_number()) else {
        return Err(XPathError::runtime(format!(
            "'{op}' needs numeric operands, got {} and {}",
            describe(left),
            describe(right)
        )));
    };
    Ok(BodyValue::Number(match op {
        BinaryOp::Add => l + r,
        BinaryOp::Sub => l - r,
        BinaryOp::Mul => l * r,
        BinaryOp::Div => l / r,
        _ => l % r,
    }))
}
