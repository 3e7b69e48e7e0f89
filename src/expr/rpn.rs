// src/expr/rpn.rs

//! Infix to postfix conversion (shunting-yard).
//!
//! Parentheses are pushed as markers on the operator stack. Operators of
//! equal precedence pop each other when left-associative, which keeps
//! `8 - 3 - 2` as `(8 - 3) - 2`.

use crate::errors::{ValidationError, ValidationErrorKind};
use crate::expr::token::{Operator, PostfixToken, Token};

#[derive(Debug, Clone, Copy)]
enum StackEntry {
    Operator(Operator),
    Paren,
}

/// Convert a validated infix stream into postfix order.
///
/// Numeric tokens are parsed here; a token that is not a float literal (for
/// example a lone `.`) fails as `invalid number: <token>`.
pub fn to_postfix(tokens: &[Token]) -> Result<Vec<PostfixToken>, ValidationError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<StackEntry> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(text) => {
                let value: f64 = text.parse().map_err(|_| {
                    ValidationError::new(ValidationErrorKind::InvalidNumber(text.clone()))
                })?;
                output.push(PostfixToken::Number(value));
            }
            Token::Operator(op) => {
                while let Some(StackEntry::Operator(top)) = stack.last().copied() {
                    let pops = top.precedence() > op.precedence()
                        || (top.precedence() == op.precedence() && op.is_left_associative());
                    if !pops {
                        break;
                    }
                    stack.pop();
                    output.push(PostfixToken::Operator(top));
                }
                stack.push(StackEntry::Operator(*op));
            }
            Token::LeftParen => stack.push(StackEntry::Paren),
            Token::RightParen => loop {
                match stack.pop() {
                    Some(StackEntry::Operator(top)) => output.push(PostfixToken::Operator(top)),
                    Some(StackEntry::Paren) => break,
                    None => {
                        return Err(ValidationError::new(
                            ValidationErrorKind::UnmatchedParentheses,
                        ));
                    }
                }
            },
        }
    }

    while let Some(entry) = stack.pop() {
        match entry {
            StackEntry::Operator(op) => output.push(PostfixToken::Operator(op)),
            StackEntry::Paren => {
                return Err(ValidationError::new(
                    ValidationErrorKind::UnmatchedParentheses,
                ));
            }
        }
    }

    Ok(output)
}
