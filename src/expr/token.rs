// src/expr/token.rs

//! Token and operator types shared by the tokenizer, the postfix converter,
//! the task graph builder and the workers.

use std::fmt;

use crate::errors::ComputeError;

/// Binary operator.
///
/// The validator only ever emits the four arithmetic operators; `Modulo` and
/// `Power` exist for the worker-facing interface, where the operation travels
/// as a symbol string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

impl Operator {
    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        match symbol {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Subtract),
            "*" => Some(Operator::Multiply),
            "/" => Some(Operator::Divide),
            "%" => Some(Operator::Modulo),
            "^" => Some(Operator::Power),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::Power => "^",
        }
    }

    /// Binding strength used by the postfix converter.
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Subtract => 1,
            Operator::Multiply | Operator::Divide | Operator::Modulo => 2,
            Operator::Power => 3,
        }
    }

    pub fn is_left_associative(self) -> bool {
        !matches!(self, Operator::Power)
    }

    /// Apply the operator with the same guards every worker enforces.
    pub fn apply(self, lhs: f64, rhs: f64) -> Result<f64, ComputeError> {
        match self {
            Operator::Add => Ok(lhs + rhs),
            Operator::Subtract => Ok(lhs - rhs),
            Operator::Multiply => Ok(lhs * rhs),
            Operator::Divide => {
                if rhs == 0.0 {
                    return Err(ComputeError::DivisionByZero);
                }
                Ok(lhs / rhs)
            }
            Operator::Modulo => {
                if rhs == 0.0 {
                    return Err(ComputeError::ModuloByZero);
                }
                if lhs.fract() != 0.0 || rhs.fract() != 0.0 {
                    return Err(ComputeError::InvalidModulo);
                }
                Ok(lhs % rhs)
            }
            Operator::Power => Ok(lhs.powf(rhs)),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One element of a validated infix token stream.
///
/// Numbers keep their source text; they are only parsed into `f64` by the
/// postfix converter.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(String),
    Operator(Operator),
    LeftParen,
    RightParen,
}

impl Token {
    pub fn is_operator(&self) -> bool {
        matches!(self, Token::Operator(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Token::Number(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(text) => f.write_str(text),
            Token::Operator(op) => write!(f, "{op}"),
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
        }
    }
}

/// One element of a postfix (RPN) stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PostfixToken {
    Number(f64),
    Operator(Operator),
}

impl fmt::Display for PostfixToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostfixToken::Number(value) => write!(f, "{value}"),
            PostfixToken::Operator(op) => write!(f, "{op}"),
        }
    }
}
