// src/errors.rs

//! Crate-wide error types.
//!
//! - [`CalcdagError`] is what every fallible operation in the crate returns.
//! - [`ValidationError`] is raised synchronously while parsing an expression;
//!   no tasks exist yet when it is produced.
//! - [`ComputeError`] is raised by a worker while executing a single task and
//!   reaches the client only through the expression's error state.

use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcdagError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Expression not found: {0}")]
    ExpressionNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error(transparent)]
    Compute(#[from] ComputeError),

    #[error("Transient I/O error: {0}")]
    TransientIo(String),

    #[error("Invalid {entity} transition for {id}: {from} -> {to}")]
    InvalidTransition {
        entity: &'static str,
        id: String,
        from: String,
        to: String,
    },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CalcdagError {
    /// Whether this error is the 404-equivalent for an unknown id.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CalcdagError::ExpressionNotFound(_) | CalcdagError::TaskNotFound(_)
        )
    }

    /// Whether a worker loop should simply retry on its next iteration.
    pub fn is_transient(&self) -> bool {
        matches!(self, CalcdagError::TransientIo(_) | CalcdagError::IoError(_))
    }
}

/// Classified reason an expression was rejected before decomposition.
///
/// `Display` yields the bare diagnostic (e.g. `invalid structure`); the
/// wrapping [`ValidationError`] adds the `invalid expression:` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    EmptyExpression,
    InvalidStructure,
    TooFewTokens,
    TrailingOperator,
    UnmatchedParentheses,
    InvalidNumberFormat,
    UnexpectedCharacter(char),
    InvalidNumber(String),
    TooFewOperands,
    TooManyOperands,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationErrorKind::EmptyExpression => write!(f, "empty expression"),
            ValidationErrorKind::InvalidStructure => write!(f, "invalid structure"),
            ValidationErrorKind::TooFewTokens => write!(f, "too few tokens"),
            ValidationErrorKind::TrailingOperator => write!(f, "trailing operator"),
            ValidationErrorKind::UnmatchedParentheses => write!(f, "unmatched parentheses"),
            ValidationErrorKind::InvalidNumberFormat => write!(f, "invalid number format"),
            ValidationErrorKind::UnexpectedCharacter(c) => {
                write!(f, "unexpected character '{c}'")
            }
            ValidationErrorKind::InvalidNumber(token) => write!(f, "invalid number: {token}"),
            ValidationErrorKind::TooFewOperands => write!(f, "too few operands"),
            ValidationErrorKind::TooManyOperands => write!(f, "too many operands"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid expression: {kind}")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind) -> Self {
        Self { kind }
    }

    /// The bare diagnostic string, without the `invalid expression:` prefix.
    pub fn diagnostic(&self) -> String {
        self.kind.to_string()
    }
}

impl From<ValidationErrorKind> for ValidationError {
    fn from(kind: ValidationErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Failure while executing one binary operation on a worker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComputeError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("modulo by zero")]
    ModuloByZero,

    #[error("modulo operation requires integer operands")]
    InvalidModulo,

    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, CalcdagError>;
