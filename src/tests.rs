use crate::error::EvalError;
use crate::eval::Evaluator;
use crate::format::format_value;
use crate::functions;
use crate::lex::{Lexer, Token, TokenKind};
use crate::parse::Parser;
use crate::evaluate;

fn lex(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input)
        .collect::<Result<Vec<_>, _>>()
        .expect("lexes cleanly")
}

fn tree(input: &str) -> String {
    Parser::new(input).parse().expect("parses cleanly").to_string()
}

fn assert_close(expression: &str, expected: f64) {
    let value = evaluate(expression).expect(expression);
    assert!(
        (value - expected).abs() < 1e-9,
        "{expression} => {value}, expected {expected}"
    );
}

// ========================================
// LEXER TESTS
// ========================================

#[test]
fn lexer_tokenizes_simple_math() {
    let tokens = lex("1 + 2");
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].kind, TokenKind::Number(1.0));
    assert_eq!(tokens[1].kind, TokenKind::Plus);
    assert_eq!(tokens[2].kind, TokenKind::Number(2.0));
}

#[test]
fn lexer_tracks_byte_offsets() {
    let tokens = lex("10 * (3)");
    assert_eq!(tokens[0].offset, 0);
    assert_eq!(tokens[1].offset, 3);
    assert_eq!(tokens[2].offset, 5);
    assert_eq!(tokens[3].offset, 6);
    assert_eq!(tokens[4].offset, 7);
}

#[test]
fn lexer_tokenizes_function_call() {
    let tokens = lex("sqrt(16)");
    assert_eq!(tokens[0].kind, TokenKind::Ident);
    assert_eq!(tokens[0].literal, "sqrt");
    assert_eq!(tokens[1].kind, TokenKind::LeftParen);
    assert_eq!(tokens[2].kind, TokenKind::Number(16.0));
    assert_eq!(tokens[3].kind, TokenKind::RightParen);
}

#[test]
fn lexer_reads_decimals_as_one_token() {
    let tokens = lex("3.25");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Number(3.25));
    assert_eq!(tokens[0].literal, "3.25");
}

#[test]
fn lexer_rejects_double_dotted_number() {
    let result: Result<Vec<_>, _> = Lexer::new("1.2.3").collect();
    assert!(matches!(result, Err(EvalError::InvalidNumber { .. })));
}

#[test]
fn lexer_rejects_stray_character() {
    let result: Result<Vec<_>, _> = Lexer::new("2 $ 3").collect();
    assert!(matches!(
        result,
        Err(EvalError::InvalidCharacter { token: '$', .. })
    ));
}

#[test]
fn lexer_display_matches_token_lines() {
    let tokens = lex("(3.5+x)");
    let lines: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    assert_eq!(
        lines,
        vec![
            "LEFT_PAREN ( null",
            "NUMBER 3.5 3.5",
            "PLUS + null",
            "IDENTIFIER x null",
            "RIGHT_PAREN ) null",
        ]
    );
}

#[test]
fn lexer_display_adds_trailing_zero_for_integers() {
    let tokens = lex("42");
    assert_eq!(tokens[0].to_string(), "NUMBER 42 42.0");
}

// ========================================
// PARSER TESTS
// ========================================

#[test]
fn parser_honors_precedence() {
    assert_eq!(tree("2+3*4"), "(+ 2 (* 3 4))");
}

#[test]
fn parser_honors_grouping() {
    assert_eq!(tree("(2+3)*4"), "(* (+ 2 3) 4)");
}

#[test]
fn parser_is_left_associative() {
    assert_eq!(tree("10-2-3"), "(- (- 10 2) 3)");
    assert_eq!(tree("8/4/2"), "(/ (/ 8 4) 2)");
}

#[test]
fn parser_folds_unary_minus() {
    assert_eq!(tree("-3+5"), "(+ (- 3) 5)");
    assert_eq!(tree("2*-3"), "(* 2 (- 3))");
}

#[test]
fn parser_parses_nested_calls() {
    assert_eq!(tree("sqrt(abs(-16))"), "(sqrt (abs (- 16)))");
}

#[test]
fn parser_resolves_constants() {
    assert_eq!(tree("pi"), std::f64::consts::PI.to_string());
    assert_eq!(tree("e"), std::f64::consts::E.to_string());
}

#[test]
fn parser_rejects_trailing_operator() {
    assert!(matches!(
        Parser::new("2+").parse(),
        Err(EvalError::MalformedExpression { .. })
    ));
}

#[test]
fn parser_rejects_adjacent_operands() {
    assert!(matches!(
        Parser::new("2 3").parse(),
        Err(EvalError::MalformedExpression { .. })
    ));
}

// ========================================
// EVALUATION TESTS
// ========================================

#[test]
fn eval_respects_precedence() {
    assert_close("2+3*4", 14.0);
    assert_close("(2+3)*4", 20.0);
}

#[test]
fn eval_is_left_to_right_for_equal_precedence() {
    assert_close("10-2-3", 5.0);
    assert_close("100/10/2", 5.0);
}

#[test]
fn eval_distinguishes_negation_from_subtraction() {
    assert_close("-3+5", 2.0);
    assert_close("3-5", -2.0);
    assert_close("(-3)*2", -6.0);
    assert_close("3--2", 5.0);
}

#[test]
fn eval_applies_functions() {
    assert_close("sqrt(16)+1", 5.0);
    assert_close("abs(-5)", 5.0);
    assert_close("sqrt(abs(-16))", 4.0);
    assert_close("square(3)", 9.0);
    assert_close("cube(2)", 8.0);
    assert_close("reciprocal(4)", 0.25);
    assert_close("floor(2.9)+ceil(0.1)+round(0.6)", 4.0);
}

#[test]
fn eval_trig_takes_radians() {
    assert_close("sin(pi/2)", 1.0);
    assert_close("cos(0)", 1.0);
    assert_close("tan(0)", 0.0);
}

#[test]
fn eval_logarithms() {
    assert_close("log(100)", 2.0);
    assert_close("ln(e)", 1.0);
}

#[test]
fn eval_substitutes_constants_precisely() {
    assert_close("2*pi", 6.283185307179586);
    assert_close("e", 2.718281828459045);
}

#[test]
fn eval_ignores_surrounding_whitespace() {
    assert_close("  2 + 2  ", 4.0);
}

#[test]
fn eval_composes_functions_with_arithmetic() {
    assert_close("2*sin(pi/2)+sqrt(9)", 5.0);
}

// ========================================
// ERROR TESTS
// ========================================

#[test]
fn error_empty_expression() {
    assert!(matches!(evaluate(""), Err(EvalError::EmptyExpression)));
    assert!(matches!(evaluate("   "), Err(EvalError::EmptyExpression)));
}

#[test]
fn error_division_by_exact_zero() {
    assert!(matches!(evaluate("5/0"), Err(EvalError::DivisionByZero)));
    assert!(matches!(
        evaluate("1/(2-2)"),
        Err(EvalError::DivisionByZero)
    ));
    // A tiny divisor is not zero.
    assert!(evaluate("1/0.0000000001").is_ok());
}

#[test]
fn error_mismatched_parens() {
    assert!(matches!(
        evaluate("(2+3"),
        Err(EvalError::MismatchedParens { .. })
    ));
    assert!(matches!(
        evaluate("2+3)"),
        Err(EvalError::MismatchedParens { .. })
    ));
    assert!(matches!(
        evaluate(")"),
        Err(EvalError::MismatchedParens { .. })
    ));
}

#[test]
fn error_unknown_function() {
    assert!(matches!(
        evaluate("foo(1)"),
        Err(EvalError::UnknownFunction { .. })
    ));
    // A bare unknown name is never silently substituted into.
    assert!(matches!(
        evaluate("pier"),
        Err(EvalError::UnknownFunction { .. })
    ));
}

#[test]
fn error_missing_argument() {
    assert!(matches!(
        evaluate("sin"),
        Err(EvalError::MissingArgument { .. })
    ));
    assert!(matches!(
        evaluate("sin()"),
        Err(EvalError::MissingArgument { .. })
    ));
}

#[test]
fn error_malformed_operator_sequence() {
    assert!(matches!(
        evaluate("2+*3"),
        Err(EvalError::MalformedExpression { .. })
    ));
}

#[test]
fn error_invalid_result_for_nan_and_infinity() {
    assert!(matches!(
        evaluate("sqrt(-1)"),
        Err(EvalError::InvalidResult { .. })
    ));
    assert!(matches!(
        evaluate("ln(0)"),
        Err(EvalError::InvalidResult { .. })
    ));
    assert!(matches!(
        evaluate("reciprocal(0)"),
        Err(EvalError::InvalidResult { .. })
    ));
}

#[test]
fn error_invalid_number_literal() {
    assert!(matches!(
        evaluate("1.2.3+1"),
        Err(EvalError::InvalidNumber { .. })
    ));
}

#[test]
fn error_invalid_character() {
    assert!(matches!(
        evaluate("2#3"),
        Err(EvalError::InvalidCharacter { .. })
    ));
}

// ========================================
// DEPTH CAP TESTS
// ========================================

#[test]
fn parser_accepts_reasonable_nesting() {
    let expression = format!("{}1{}", "(".repeat(100), ")".repeat(100));
    assert_close(&expression, 1.0);
}

#[test]
fn parser_rejects_pathological_paren_nesting() {
    let expression = format!("{}1{}", "(".repeat(300), ")".repeat(300));
    assert!(matches!(
        evaluate(&expression),
        Err(EvalError::MalformedExpression { .. })
    ));
}

#[test]
fn parser_rejects_pathological_minus_chain() {
    let expression = format!("{}5", "-".repeat(300));
    assert!(matches!(
        evaluate(&expression),
        Err(EvalError::MalformedExpression { .. })
    ));
}

// ========================================
// FORMATTER TESTS
// ========================================

#[test]
fn format_trims_trailing_zeros() {
    assert_eq!(format_value(14.0), "14");
    assert_eq!(format_value(0.25), "0.25");
    assert_eq!(format_value(-2.5), "-2.5");
}

#[test]
fn format_caps_fractional_digits() {
    assert_eq!(format_value(2.0 / 3.0), "0.6666666667");
}

#[test]
fn format_normalizes_negative_zero() {
    assert_eq!(format_value(-0.0), "0");
    assert_eq!(format_value(-1e-13), "0");
}

#[test]
fn format_round_trips_within_tolerance() {
    for expression in ["2/3", "pi", "sqrt(2)", "10/4", "-5/3"] {
        let value = evaluate(expression).expect(expression);
        let reparsed: f64 = format_value(value).parse().expect("formatted output parses");
        assert!(
            (value - reparsed).abs() < 1e-9,
            "{expression}: {value} vs {reparsed}"
        );
    }
}

// ========================================
// FUNCTION TABLE TESTS
// ========================================

#[test]
fn table_knows_every_advertised_name() {
    for name in functions::names() {
        assert!(functions::lookup(name).is_some(), "missing {name}");
    }
}

#[test]
fn table_rejects_unknown_names() {
    assert!(functions::lookup("exp").is_none());
    assert!(functions::lookup("SIN").is_none());
}

#[test]
fn evaluator_rechecks_function_names() {
    use crate::parse::TokenTree;

    let tree = TokenTree::Call {
        name: "nope",
        offset: 0,
        arg: Box::new(TokenTree::Atom(1.0)),
    };
    assert!(matches!(
        Evaluator::new("nope(1)").eval(&tree),
        Err(EvalError::UnknownFunction { .. })
    ));
}
