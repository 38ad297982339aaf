//! Predicate bodies: the text between `[` and `]`.
//!
//! A body is tokenized, parsed by precedence climbing into a [`BodyExpr`]
//! tree, and folded as it is built: any operator or pure function whose
//! operands are all constants is evaluated once at compile time.

use std::fmt;

use wren_dom::{DomTree, NodeId};

use crate::error::XPathError;
use crate::functions::{Function, NodeFacts};
use crate::value::{BinaryOp, BodyValue, format_number};

/// A compiled predicate expression.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyExpr {
    /// A value known at compile time.
    Const(BodyValue),
    /// `@name`: the attribute's value, or `Null` when it is not set.
    Attribute(String),
    /// A function call.
    Call(Function, Vec<BodyExpr>),
    /// A binary operator.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        left: Box<BodyExpr>,
        /// Right operand.
        right: Box<BodyExpr>,
    },
}

impl BodyExpr {
    /// Compile the text of one predicate body.
    ///
    /// `suffix` is whatever follows the body in the full expression; it is
    /// only used to report the unparsed remainder in errors.
    ///
    /// # Errors
    ///
    /// [`XPathError::Parse`] for malformed syntax or bad arity,
    /// [`XPathError::UnknownFunction`] for unknown function names and
    /// [`XPathError::Runtime`] for an operator with a missing operand.
    pub fn parse(body: &str, suffix: &str) -> Result<Self, XPathError> {
        let tokens = tokenize(body, suffix)?;
        if tokens.is_empty() {
            return Err(XPathError::parse("empty predicate", suffix));
        }
        let mut parser = Parser {
            body,
            suffix,
            tokens,
            pos: 0,
        };
        let expr = parser.expression(0)?;
        if parser.pos < parser.tokens.len() {
            return Err(parser.error("unexpected token after expression"));
        }
        Ok(expr)
    }

    /// True if the expression folded down to a single constant.
    #[must_use]
    pub const fn is_const(&self) -> bool {
        matches!(self, Self::Const(_))
    }

    /// Evaluate against one node.
    ///
    /// # Errors
    ///
    /// [`XPathError::Runtime`] on operand type mismatches.
    pub fn evaluate(
        &self,
        tree: &DomTree,
        node: NodeId,
        facts: &NodeFacts<'_>,
    ) -> Result<BodyValue, XPathError> {
        match self {
            Self::Const(value) => Ok(value.clone()),
            Self::Attribute(name) => Ok(tree
                .attribute(node, name)
                .map_or(BodyValue::Null, |value| BodyValue::Str(value.into_owned()))),
            Self::Call(function, args) => {
                let values = args
                    .iter()
                    .map(|arg| arg.evaluate(tree, node, facts))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(function.call(&values, facts))
            }
            Self::Binary { op, left, right } => {
                let left = left.evaluate(tree, node, facts)?;
                let right = right.evaluate(tree, node, facts)?;
                op.apply(&left, &right)
            }
        }
    }

    fn binary(op: BinaryOp, left: Self, right: Self) -> Self {
        if let (Self::Const(l), Self::Const(r)) = (&left, &right)
            && let Ok(value) = op.apply(l, r)
        {
            return Self::Const(value);
        }
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn call(function: Function, args: Vec<Self>) -> Self {
        if !function.reads_node(args.len()) {
            let constants: Option<Vec<BodyValue>> = args
                .iter()
                .map(|arg| match arg {
                    Self::Const(value) => Some(value.clone()),
                    _ => None,
                })
                .collect();
            if let Some(values) = constants {
                return Self::Const(function.call(&values, &NodeFacts::default()));
            }
        }
        Self::Call(function, args)
    }
}

impl fmt::Display for BodyExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(BodyValue::Str(s)) => write!(f, "{s:?}"),
            Self::Const(BodyValue::Number(n)) => f.write_str(&format_number(*n)),
            Self::Const(value) => write!(f, "{value}"),
            Self::Attribute(name) => write!(f, "@{name}"),
            Self::Call(function, args) => {
                write!(f, "{function}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Self::Binary { op, left, right } => write!(f, "({left} {op} {right})"),
        }
    }
}

// =============================================================================
// Tokenizer
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Attribute(String),
    Str(String),
    Number(f64),
    Function(String),
    LParen,
    RParen,
    Comma,
    Op(BinaryOp),
}

/// Tokens paired with their byte offset in the body.
fn tokenize(body: &str, suffix: &str) -> Result<Vec<(Token, usize)>, XPathError> {
    let bytes = body.as_bytes();
    let remainder = |at: usize| format!("{}{suffix}", &body[at..]);
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        let c = bytes[i];
        let token = match c {
            b' ' | b'\t' | b'\r' | b'\n' => {
                i += 1;
                continue;
            }
            b'(' => {
                i += 1;
                Token::LParen
            }
            b')' => {
                i += 1;
                Token::RParen
            }
            b',' => {
                i += 1;
                Token::Comma
            }
            b'=' => {
                i += 1;
                Token::Op(BinaryOp::Eq)
            }
            b'!' if bytes.get(i + 1) == Some(&b'=') => {
                i += 2;
                Token::Op(BinaryOp::Ne)
            }
            b'<' | b'>' => {
                let or_equal = bytes.get(i + 1) == Some(&b'=');
                i += if or_equal { 2 } else { 1 };
                Token::Op(match (c, or_equal) {
                    (b'<', false) => BinaryOp::Lt,
                    (b'<', true) => BinaryOp::Le,
                    (_, false) => BinaryOp::Gt,
                    (_, true) => BinaryOp::Ge,
                })
            }
            b'|' if bytes.get(i + 1) == Some(&b'|') => {
                i += 2;
                Token::Op(BinaryOp::Concat)
            }
            b'+' => {
                i += 1;
                Token::Op(BinaryOp::Add)
            }
            b'-' => {
                i += 1;
                Token::Op(BinaryOp::Sub)
            }
            b'*' => {
                i += 1;
                Token::Op(BinaryOp::Mul)
            }
            b'"' | b'\'' => {
                let Some(len) = body[i + 1..].find(char::from(c)) else {
                    return Err(XPathError::parse("unterminated string literal", &remainder(start)));
                };
                let literal = body[i + 1..i + 1 + len].to_string();
                i += len + 2;
                Token::Str(literal)
            }
            b'@' => {
                i += 1;
                let name_len = name_length(&body[i..]);
                if name_len == 0 {
                    return Err(XPathError::parse("expected attribute name after '@'", &remainder(start)));
                }
                let name = body[i..i + name_len].to_ascii_lowercase();
                i += name_len;
                Token::Attribute(name)
            }
            b'0'..=b'9' | b'.' => {
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                let Ok(number) = body[start..i].parse::<f64>() else {
                    return Err(XPathError::parse("malformed number", &remainder(start)));
                };
                Token::Number(number)
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                i += name_length(&body[i..]);
                let word = &body[start..i];
                let next = body[i..].trim_start();
                if next.starts_with('(') {
                    Token::Function(word.to_string())
                } else {
                    match word {
                        "div" => Token::Op(BinaryOp::Div),
                        "mod" => Token::Op(BinaryOp::Mod),
                        "and" => Token::Op(BinaryOp::And),
                        "or" => Token::Op(BinaryOp::Or),
                        _ => {
                            return Err(XPathError::parse(
                                format!("unexpected name '{word}'"),
                                &remainder(start),
                            ));
                        }
                    }
                }
            }
            _ => {
                return Err(XPathError::parse("unexpected character", &remainder(start)));
            }
        };
        tokens.push((token, start));
    }
    Ok(tokens)
}

fn name_length(text: &str) -> usize {
    text.bytes()
        .take_while(|&b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b':' | b'.'))
        .count()
}

// =============================================================================
// Parser
// =============================================================================

struct Parser<'a> {
    body: &'a str,
    suffix: &'a str,
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn remainder(&self) -> String {
        let offset = self
            .tokens
            .get(self.pos)
            .map_or(self.body.len(), |&(_, offset)| offset);
        format!("{}{}", &self.body[offset..], self.suffix)
    }

    fn error(&self, message: &str) -> XPathError {
        XPathError::parse(message, &self.remainder())
    }

    fn expect(&mut self, wanted: &Token, what: &str) -> Result<(), XPathError> {
        if self.peek() == Some(wanted) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected {what}")))
        }
    }

    fn expression(&mut self, min_precedence: u8) -> Result<BodyExpr, XPathError> {
        let mut left = self.unary()?;
        while let Some(&Token::Op(op)) = self.peek() {
            if op.precedence() < min_precedence {
                break;
            }
            self.pos += 1;
            let right = self.expression(op.precedence() + 1)?;
            left = BodyExpr::binary(op, left, right);
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<BodyExpr, XPathError> {
        if self.peek() == Some(&Token::Op(BinaryOp::Sub)) {
            self.pos += 1;
            let operand = self.unary()?;
            return Ok(BodyExpr::binary(
                BinaryOp::Mul,
                BodyExpr::Const(BodyValue::Number(-1.0)),
                operand,
            ));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<BodyExpr, XPathError> {
        let Some((token, _)) = self.tokens.get(self.pos).cloned() else {
            return Err(XPathError::runtime("operator is missing its right operand"));
        };
        match token {
            Token::Attribute(name) => {
                self.pos += 1;
                Ok(BodyExpr::Attribute(name))
            }
            Token::Str(s) => {
                self.pos += 1;
                Ok(BodyExpr::Const(BodyValue::Str(s)))
            }
            Token::Number(n) => {
                self.pos += 1;
                Ok(BodyExpr::Const(BodyValue::Number(n)))
            }
            Token::LParen => {
                self.pos += 1;
                let inner = self.expression(0)?;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            Token::Function(name) => {
                let function = Function::lookup(&name)?;
                self.pos += 1;
                self.expect(&Token::LParen, "'('")?;
                let mut args = Vec::new();
                if self.peek() != Some(&Token::RParen) {
                    loop {
                        args.push(self.expression(0)?);
                        if self.peek() == Some(&Token::Comma) {
                            self.pos += 1;
                        } else {
                            break;
                        }
                    }
                }
                self.expect(&Token::RParen, "')' to close the argument list")?;
                function.check_arity(args.len(), &self.remainder())?;
                Ok(BodyExpr::call(function, args))
            }
            Token::Op(op) => Err(XPathError::runtime(format!(
                "operator '{op}' is missing its left operand"
            ))),
            Token::RParen | Token::Comma => Err(self.error("expected an operand")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<BodyExpr, XPathError> {
        BodyExpr::parse(body, "]")
    }

    #[test]
    fn test_folds_string_concat() {
        let expr = parse(r#""ite" || "m2""#).unwrap();
        assert_eq!(expr, BodyExpr::Const(BodyValue::Str("item2".into())));
    }

    #[test]
    fn test_folds_math_inside_comparison() {
        let expr = parse("@n = 1 + 2 * 3").unwrap();
        assert_eq!(
            expr,
            BodyExpr::Binary {
                op: BinaryOp::Eq,
                left: Box::new(BodyExpr::Attribute("n".into())),
                right: Box::new(BodyExpr::Const(BodyValue::Number(7.0))),
            }
        );
    }

    #[test]
    fn test_precedence_and_or() {
        let expr = parse("true() or false() and false()").unwrap();
        assert_eq!(expr, BodyExpr::Const(BodyValue::Boolean(true)));
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(parse("-2").unwrap(), BodyExpr::Const(BodyValue::Number(-2.0)));
    }

    #[test]
    fn test_position_is_not_folded() {
        assert!(!parse("position() = 2").unwrap().is_const());
    }

    #[test]
    fn test_dangling_operator_is_runtime_error() {
        assert!(parse("@id =").unwrap_err().is_runtime_error());
        assert!(parse("and true()").unwrap_err().is_runtime_error());
    }

    #[test]
    fn test_bare_name_is_parse_error() {
        let err = parse("foo = 1").unwrap_err();
        assert!(matches!(err, XPathError::Parse { ref remainder, .. } if remainder == "foo = 1]"));
    }

    #[test]
    fn test_display_round_trips_shape() {
        let expr = parse("@a = concat(@b, 'x')").unwrap();
        assert_eq!(expr.to_string(), r#"(@a = concat(@b, "x"))"#);
    }
}
