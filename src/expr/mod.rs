// src/expr/mod.rs

//! Expression parsing.
//!
//! - [`tokenizer`] turns source text into a validated infix token stream.
//! - [`rpn`] converts that stream to postfix order.
//! - [`eval`] evaluates a postfix stream locally (reference evaluator).
//! - [`token`] holds the token and operator types.
//!
//! Everything here is pure: no logging, no shared state. Callers decide what
//! to record about a rejected expression.

pub mod eval;
pub mod rpn;
pub mod token;
pub mod tokenizer;

pub use eval::{evaluate, evaluate_postfix};
pub use rpn::to_postfix;
pub use token::{Operator, PostfixToken, Token};
pub use tokenizer::{tokenize, validate_structure};

use crate::errors::ValidationError;

/// Tokenize, validate and convert `text` to postfix order.
pub fn parse(text: &str) -> Result<Vec<PostfixToken>, ValidationError> {
    let tokens = tokenize(text)?;
    to_postfix(&tokens)
}
