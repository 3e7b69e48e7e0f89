// src/expr/eval.rs

//! Local, single-threaded evaluation of a postfix stream.
//!
//! This is the reference the distributed pipeline is checked against: it
//! walks the same postfix order the task graph builder walks and applies
//! [`Operator::apply`](crate::expr::Operator::apply), so guards such as
//! division by zero behave identically.

use crate::errors::{Result, ValidationError, ValidationErrorKind};
use crate::expr::token::PostfixToken;

/// Evaluate a postfix stream directly.
pub fn evaluate_postfix(postfix: &[PostfixToken]) -> Result<f64> {
    let mut stack: Vec<f64> = Vec::with_capacity(postfix.len());

    for token in postfix {
        match token {
            PostfixToken::Number(value) => stack.push(*value),
            PostfixToken::Operator(op) => {
                let (Some(rhs), Some(lhs)) = (stack.pop(), stack.pop()) else {
                    return Err(ValidationError::new(ValidationErrorKind::TooFewOperands).into());
                };
                stack.push(op.apply(lhs, rhs)?);
            }
        }
    }

    match stack.as_slice() {
        [value] => Ok(*value),
        [] => Err(ValidationError::new(ValidationErrorKind::TooFewOperands).into()),
        _ => Err(ValidationError::new(ValidationErrorKind::TooManyOperands).into()),
    }
}

/// Tokenize, validate, convert and evaluate `text` in-process.
pub fn evaluate(text: &str) -> Result<f64> {
    let postfix = super::parse(text)?;
    evaluate_postfix(&postfix)
}
