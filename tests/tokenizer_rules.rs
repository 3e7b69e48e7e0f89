use calcdag::errors::{CalcdagError, ValidationErrorKind};
use calcdag::expr::{self, Operator, Token, evaluate, parse, tokenize};

fn kind_of(input: &str) -> ValidationErrorKind {
    match parse(input) {
        Ok(postfix) => panic!("expected {input:?} to be rejected, got {postfix:?}"),
        Err(e) => e.kind,
    }
}

fn num(text: &str) -> Token {
    Token::Number(text.to_string())
}

#[test]
fn simple_expression_tokenizes() {
    let tokens = tokenize(" 12 + 3.5 ").unwrap();
    assert_eq!(
        tokens,
        vec![num("12"), Token::Operator(Operator::Add), num("3.5")]
    );
}

#[test]
fn blank_input_is_empty_expression() {
    assert_eq!(kind_of(""), ValidationErrorKind::EmptyExpression);
    assert_eq!(kind_of("   "), ValidationErrorKind::EmptyExpression);
}

#[test]
fn empty_parens_are_empty_expression() {
    assert_eq!(kind_of("()"), ValidationErrorKind::EmptyExpression);
    assert_eq!(kind_of("2+()"), ValidationErrorKind::EmptyExpression);
}

#[test]
fn operator_next_to_paren_is_invalid_structure() {
    assert_eq!(kind_of("(2+)*3"), ValidationErrorKind::InvalidStructure);
    assert_eq!(kind_of("(*2)+3"), ValidationErrorKind::InvalidStructure);
}

#[test]
fn doubled_plus_is_invalid_structure() {
    assert_eq!(kind_of("2++2"), ValidationErrorKind::InvalidStructure);
}

#[test]
fn double_minus_is_invalid_structure() {
    assert_eq!(kind_of("2--3"), ValidationErrorKind::InvalidStructure);
    assert_eq!(kind_of("--2"), ValidationErrorKind::InvalidStructure);
}

#[test]
fn no_operator_is_too_few_tokens() {
    assert_eq!(kind_of("42"), ValidationErrorKind::TooFewTokens);
    assert_eq!(kind_of("2 3"), ValidationErrorKind::TooFewTokens);
}

#[test]
fn lone_operator_is_too_few_tokens() {
    assert_eq!(kind_of("+"), ValidationErrorKind::TooFewTokens);
}

#[test]
fn leading_binary_operator_with_one_operand_is_too_few_tokens() {
    assert_eq!(kind_of("+2"), ValidationErrorKind::TooFewTokens);
}

#[test]
fn trailing_operator_depends_on_length() {
    assert_eq!(kind_of("2+"), ValidationErrorKind::TooFewTokens);
    assert_eq!(kind_of("2+3+"), ValidationErrorKind::TrailingOperator);
}

#[test]
fn unary_minus_after_operator_is_rewritten() {
    // `2*-3` becomes `2 * -1 * 3`: two operators against three operands.
    let tokens = tokenize("2*-3").unwrap();
    assert_eq!(
        tokens,
        vec![
            num("2"),
            Token::Operator(Operator::Multiply),
            num("-1"),
            Token::Operator(Operator::Multiply),
            num("3"),
        ]
    );
    assert_eq!(evaluate("2*-3").unwrap(), -6.0);
}

#[test]
fn whitespace_breaks_unary_minus_adjacency() {
    // `2 * -3` reads as `2 * - 3`: two binary operators, two operands.
    assert_eq!(kind_of("2 * -3"), ValidationErrorKind::InvalidStructure);
    assert_eq!(kind_of(" -2+3"), ValidationErrorKind::InvalidStructure);
    assert_eq!(evaluate("2 *-3").unwrap(), -6.0);
}

#[test]
fn bad_number_format() {
    assert_eq!(kind_of("1.2.3+1"), ValidationErrorKind::InvalidNumberFormat);
}

#[test]
fn unexpected_character_names_the_character() {
    let err = parse("2+a").unwrap_err();
    assert_eq!(err.kind, ValidationErrorKind::UnexpectedCharacter('a'));
    assert_eq!(err.diagnostic(), "unexpected character 'a'");
    assert_eq!(err.to_string(), "invalid expression: unexpected character 'a'");
}

#[test]
fn unmatched_parentheses() {
    assert_eq!(kind_of("(2+3"), ValidationErrorKind::UnmatchedParentheses);
    assert_eq!(kind_of(")2+3("), ValidationErrorKind::UnmatchedParentheses);
    assert_eq!(kind_of("(2+3))"), ValidationErrorKind::UnmatchedParentheses);
}

#[test]
fn lone_dot_is_invalid_number() {
    let err = parse(". + 1").unwrap_err();
    assert_eq!(err.kind, ValidationErrorKind::InvalidNumber(".".to_string()));
    assert_eq!(err.diagnostic(), "invalid number: .");
}

#[test]
fn leading_unary_minus_is_rewritten() {
    let tokens = tokenize("-2+3").unwrap();
    assert_eq!(
        tokens,
        vec![
            num("-1"),
            Token::Operator(Operator::Multiply),
            num("2"),
            Token::Operator(Operator::Add),
            num("3"),
        ]
    );
    assert_eq!(evaluate("-2+3").unwrap(), 1.0);
}

#[test]
fn unary_minus_after_open_paren() {
    assert_eq!(evaluate("(-2)*3").unwrap(), -6.0);
    assert_eq!(evaluate("-(2+3)").unwrap(), -5.0);
}

#[test]
fn postfix_respects_precedence_and_associativity() {
    let render = |text: &str| {
        expr::parse(text)
            .unwrap()
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    };
    assert_eq!(render("2+3*4"), "2 3 4 * +");
    assert_eq!(render("8-3-2"), "8 3 - 2 -");
    assert_eq!(render("(2+3)*4"), "2 3 + 4 *");
}

#[test]
fn direct_evaluation() {
    assert_eq!(evaluate("2+3*4").unwrap(), 14.0);
    assert_eq!(evaluate("8-3-2").unwrap(), 3.0);
    assert_eq!(evaluate("2*(3+4)-5/5").unwrap(), 13.0);
    assert_eq!(evaluate("0.5+0.25").unwrap(), 0.75);
}

#[test]
fn direct_evaluation_reports_compute_errors() {
    let err = evaluate("5/0").unwrap_err();
    assert!(matches!(err, CalcdagError::Compute(_)));
    assert_eq!(err.to_string(), "division by zero");
}

#[test]
fn direct_evaluation_reports_leftover_operands() {
    let err = evaluate("(2)(3)+1").unwrap_err();
    match err {
        CalcdagError::Validation(v) => assert_eq!(v.kind, ValidationErrorKind::TooManyOperands),
        other => panic!("unexpected error: {other:?}"),
    }
}
