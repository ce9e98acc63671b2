//! Lexical analysis: split the input into literal and operator tokens.
//!
//! The input format is rigid. Tokens are separated by exactly one space and
//! nothing is tokenized inside a token, so `1+2` is a single unrecognised
//! token and `1  + 2` contains an empty one. How unrecognised tokens are
//! treated is decided by [`TokenMode`].

use std::fmt;
use std::str::FromStr;

use crate::core::error::{CompileError, CompileResult};

/// Supported binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
}

impl BinaryOp {
    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Mul => 2,
            BinaryOp::Add | BinaryOp::Sub => 1,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
        }
    }
}

impl TryFrom<char> for BinaryOp {
    type Error = CompileError;

    fn try_from(c: char) -> CompileResult<Self> {
        match c {
            '+' => Ok(BinaryOp::Add),
            '-' => Ok(BinaryOp::Sub),
            '*' => Ok(BinaryOp::Mul),
            other => Err(CompileError::UnsupportedOperator {
                symbol: other.to_string(),
            }),
        }
    }
}

impl FromStr for BinaryOp {
    type Err = CompileError;

    fn from_str(s: &str) -> CompileResult<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => BinaryOp::try_from(c),
            _ => Err(CompileError::UnsupportedOperator {
                symbol: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A classified input token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Decimal digits, kept as written.
    Literal(&'a str),
    Operator(BinaryOp),
    /// Anything else, including the empty token between two spaces.
    Unknown(&'a str),
}

impl Token<'_> {
    fn describe(&self) -> String {
        match self {
            Token::Literal(text) | Token::Unknown(text) if !text.is_empty() => format!("`{text}`"),
            Token::Operator(op) => format!("`{op}`"),
            _ => "an empty token".to_string(),
        }
    }
}

/// Policy for tokens that are neither literals nor operators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenMode {
    /// Reject the expression.
    #[default]
    Strict,
    /// Drop the token and keep going.
    Lenient,
}

fn is_literal(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Split on single spaces and classify every piece.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    input
        .split(' ')
        .map(|text| {
            if is_literal(text) {
                Token::Literal(text)
            } else if let Ok(op) = text.parse::<BinaryOp>() {
                Token::Operator(op)
            } else {
                Token::Unknown(text)
            }
        })
        .collect()
}

/// Apply `mode` to unrecognised tokens.
pub fn recognized(tokens: Vec<Token<'_>>, mode: TokenMode) -> CompileResult<Vec<Token<'_>>> {
    let mut out = Vec::with_capacity(tokens.len());
    for (pos, token) in tokens.into_iter().enumerate() {
        match token {
            Token::Unknown(_) if mode == TokenMode::Strict => {
                return Err(CompileError::malformed(format!(
                    "unrecognized {} at position {pos}",
                    token.describe()
                )));
            }
            Token::Unknown(text) => {
                log::warn!("skipping unrecognized token {:?} at position {}", text, pos);
            }
            _ => out.push(token),
        }
    }
    Ok(out)
}

/// Verify the `operand (operator operand)*` shape before any code is emitted.
pub fn check_arity(tokens: &[Token<'_>]) -> CompileResult<()> {
    let mut expect_operand = true;

    for (pos, token) in tokens.iter().enumerate() {
        match (expect_operand, token) {
            (true, Token::Literal(_)) => expect_operand = false,
            (false, Token::Operator(_)) => expect_operand = true,
            (_, Token::Unknown(_)) => continue,
            (true, _) => {
                return Err(CompileError::malformed(format!(
                    "expected an operand at position {pos}, found {}",
                    token.describe()
                )));
            }
            (false, _) => {
                return Err(CompileError::malformed(format!(
                    "expected an operator at position {pos}, found {}",
                    token.describe()
                )));
            }
        }
    }

    if !tokens.iter().any(|t| !matches!(t, Token::Unknown(_))) {
        return Err(CompileError::malformed("expression is empty"));
    }
    if expect_operand {
        return Err(CompileError::malformed("expression ends with an operator"));
    }
    Ok(())
}
