// src/expr/tokenizer.rs

//! Tokenizer and structural validator.
//!
//! [`tokenize`] either returns a complete, structurally legal token stream or
//! a classified [`ValidationError`]; it never hands back a partial stream.
//!
//! Scanning rules:
//! - whitespace is skipped;
//! - runs of digits and `.` form one number (more than one `.` is an
//!   "invalid number format");
//! - parentheses are depth-tracked ("unmatched parentheses");
//! - a `-` that is the first character, or whose immediately preceding
//!   character is an operator or `(`, is unary and becomes the two tokens
//!   `-1 *`; whitespace in between breaks the adjacency, so `2 * -3` is a
//!   binary minus. Two adjacent minus signs are an "invalid structure";
//! - anything else is an "unexpected character".
//!
//! The structural sweep in [`validate_structure`] then runs its checks in a
//! fixed order, each with its own diagnostic.

use crate::errors::{ValidationError, ValidationErrorKind};
use crate::expr::token::{Operator, Token};

fn fail<T>(kind: ValidationErrorKind) -> Result<T, ValidationError> {
    Err(ValidationError::new(kind))
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/')
}

/// Split `input` into validated infix tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ValidationError> {
    if input.trim().is_empty() {
        return fail(ValidationErrorKind::EmptyExpression);
    }

    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut depth: usize = 0;
    // Character immediately before `i`, whitespace included.
    let mut prev: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            prev = Some(c);
            i += 1;
            continue;
        }

        match c {
            '(' => {
                depth += 1;
                tokens.push(Token::LeftParen);
            }
            ')' => {
                if depth == 0 {
                    return fail(ValidationErrorKind::UnmatchedParentheses);
                }
                depth -= 1;
                tokens.push(Token::RightParen);
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                if text.matches('.').count() > 1 {
                    return fail(ValidationErrorKind::InvalidNumberFormat);
                }
                tokens.push(Token::Number(text));
                prev = Some(chars[i - 1]);
                continue;
            }
            '+' | '-' | '*' | '/' => {
                if c == '-' && prev == Some('-') {
                    return fail(ValidationErrorKind::InvalidStructure);
                }

                let unary = c == '-'
                    && match prev {
                        None => true,
                        Some(p) => p == '(' || is_operator_char(p),
                    };

                if unary {
                    tokens.push(Token::Number("-1".to_string()));
                    tokens.push(Token::Operator(Operator::Multiply));
                } else if let Some(op) = Operator::from_symbol(&c.to_string()) {
                    tokens.push(Token::Operator(op));
                }
            }
            other => return fail(ValidationErrorKind::UnexpectedCharacter(other)),
        }

        prev = Some(c);
        i += 1;
    }

    if depth != 0 {
        return fail(ValidationErrorKind::UnmatchedParentheses);
    }

    validate_structure(&tokens)?;
    Ok(tokens)
}

/// Post-tokenization sweep. Order matters: the first failing rule wins.
pub fn validate_structure(tokens: &[Token]) -> Result<(), ValidationError> {
    if tokens
        .windows(2)
        .any(|w| w[0] == Token::LeftParen && w[1] == Token::RightParen)
    {
        return fail(ValidationErrorKind::EmptyExpression);
    }

    for w in tokens.windows(2) {
        let operator_then_close = w[0].is_operator() && w[1] == Token::RightParen;
        let open_then_operator = w[0] == Token::LeftParen && w[1].is_operator();
        if operator_then_close || open_then_operator {
            return fail(ValidationErrorKind::InvalidStructure);
        }
    }

    let operators = tokens.iter().filter(|t| t.is_operator()).count();
    let operands = tokens.iter().filter(|t| t.is_number()).count();

    if operators == 0 {
        return fail(ValidationErrorKind::TooFewTokens);
    }

    if tokens.len() == 1 && tokens[0].is_operator() {
        return fail(ValidationErrorKind::TooFewTokens);
    }

    if tokens.len() > 1 && tokens.last().is_some_and(Token::is_operator) {
        if tokens.len() == 2 {
            return fail(ValidationErrorKind::TooFewTokens);
        }
        return fail(ValidationErrorKind::TrailingOperator);
    }

    if operands <= 1 {
        return fail(ValidationErrorKind::TooFewTokens);
    }

    if operands <= operators {
        return fail(ValidationErrorKind::InvalidStructure);
    }

    Ok(())
}
