//! A narrow arithmetic evaluator for constant node values.
//!
//! Only numeric literals, parentheses, unary negation and the binary operators
//! `+ - * / **` are accepted. Identifiers, calls and every other operator are
//! rejected at parse time.
//!
//! Precedence follows the usual arithmetic rules: `**` binds tightest and is
//! right-associative, unary minus binds looser than `**` (`-2**2 == -4`), then
//! `* /`, then `+ -`, both left-associative.

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("invalid numeric literal '{0}'")]
    InvalidNumber(String),

    #[error("unexpected {found} at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is not a finite number")]
    NonFinite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Power => "**",
        };
        f.write_str(symbol)
    }
}

/// Parsed form of a constant expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(f64),
    Negate(Box<Expression>),
    Binary(BinaryOp, Box<Expression>, Box<Expression>),
}

impl Expression {
    /// Parses `source` without evaluating it.
    pub fn parse(source: &str) -> Result<Expression, ExpressionError> {
        let tokens = tokenize(source)?;
        if tokens.is_empty() {
            return Err(ExpressionError::Empty);
        }
        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.parse_sum()?;
        match parser.peek() {
            None => Ok(expr),
            Some((token, offset)) => Err(ExpressionError::UnexpectedToken {
                found: token.to_string(),
                offset,
            }),
        }
    }

    pub fn eval(&self) -> Result<f64, ExpressionError> {
        let value = match self {
            Expression::Number(n) => *n,
            Expression::Negate(inner) => -inner.eval()?,
            Expression::Binary(op, l, r) => {
                let (l, r) = (l.eval()?, r.eval()?);
                match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Subtract => l - r,
                    BinaryOp::Multiply => l * r,
                    BinaryOp::Divide => {
                        if r == 0.0 {
                            return Err(ExpressionError::DivisionByZero);
                        }
                        l / r
                    }
                    BinaryOp::Power => {
                        if l == 0.0 && r < 0.0 {
                            return Err(ExpressionError::DivisionByZero);
                        }
                        l.powf(r)
                    }
                }
            }
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ExpressionError::NonFinite)
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Number(n) => write!(f, "{}", n),
            Expression::Negate(inner) => write!(f, "(-{})", inner),
            Expression::Binary(op, l, r) => write!(f, "({} {} {})", l, op, r),
        }
    }
}

/// Parses and evaluates a constant expression to a double.
pub fn evaluate(source: &str) -> Result<f64, ExpressionError> {
    Expression::parse(source)?.eval()
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    DoubleStar,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {}", n),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::DoubleStar => f.write_str("'**'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ExpressionError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;
        let token = match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                i += 1;
                continue;
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'/' => Token::Slash,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'*' => {
                if bytes.get(i + 1) == Some(&b'*') {
                    i += 1;
                    Token::DoubleStar
                } else {
                    Token::Star
                }
            }
            b'0'..=b'9' | b'.' => {
                i = scan_number(bytes, i);
                let literal = &source[start..i];
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| ExpressionError::InvalidNumber(literal.to_string()))?;
                tokens.push((Token::Number(value), start));
                continue;
            }
            _ => {
                // Offsets are byte offsets; recover the full char for the message.
                let found = source[start..].chars().next().unwrap_or('?');
                return Err(ExpressionError::UnexpectedChar {
                    found,
                    offset: start,
                });
            }
        };
        tokens.push((token, start));
        i += 1;
    }

    Ok(tokens)
}

/// Returns the end offset of the numeric literal starting at `start`.
fn scan_number(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
        i += 1;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<(&Token, usize)> {
        self.tokens.get(self.pos).map(|(t, o)| (t, *o))
    }

    fn end_offset(&self) -> usize {
        self.tokens.last().map_or(0, |(_, o)| *o + 1)
    }

    fn advance(&mut self) -> Option<(Token, usize)> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_sum(&mut self) -> Result<Expression, ExpressionError> {
        let mut lhs = self.parse_product()?;
        loop {
            let op = match self.peek() {
                Some((Token::Plus, _)) => BinaryOp::Add,
                Some((Token::Minus, _)) => BinaryOp::Subtract,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_product()?;
            lhs = Expression::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn parse_product(&mut self) -> Result<Expression, ExpressionError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some((Token::Star, _)) => BinaryOp::Multiply,
                Some((Token::Slash, _)) => BinaryOp::Divide,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_unary()?;
            lhs = Expression::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn parse_unary(&mut self) -> Result<Expression, ExpressionError> {
        if let Some((Token::Minus, _)) = self.peek() {
            self.pos += 1;
            let operand = self.parse_unary()?;
            return Ok(Expression::Negate(Box::new(operand)));
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> Result<Expression, ExpressionError> {
        let base = self.parse_atom()?;
        if let Some((Token::DoubleStar, _)) = self.peek() {
            self.pos += 1;
            // The exponent may itself be negated: 2 ** -1
            let exponent = self.parse_unary()?;
            return Ok(Expression::Binary(
                BinaryOp::Power,
                Box::new(base),
                Box::new(exponent),
            ));
        }
        Ok(base)
    }

    fn parse_atom(&mut self) -> Result<Expression, ExpressionError> {
        let end = self.end_offset();
        match self.advance() {
            Some((Token::Number(n), _)) => Ok(Expression::Number(n)),
            Some((Token::LParen, _)) => {
                let inner = self.parse_sum()?;
                match self.advance() {
                    Some((Token::RParen, _)) => Ok(inner),
                    Some((token, offset)) => Err(ExpressionError::UnexpectedToken {
                        found: token.to_string(),
                        offset,
                    }),
                    None => Err(ExpressionError::UnexpectedToken {
                        found: "end of input".to_string(),
                        offset: end,
                    }),
                }
            }
            Some((token, offset)) => Err(ExpressionError::UnexpectedToken {
                found: token.to_string(),
                offset,
            }),
            None => Err(ExpressionError::UnexpectedToken {
                found: "end of input".to_string(),
                offset: end,
            }),
        }
    }
}
