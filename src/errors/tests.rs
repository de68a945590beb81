//! Unit tests for diagnostics.

use std::rc::Rc;

use crate::{
    errors::errors::{Diagnostic, DiagnosticBag, DiagnosticKind, ErrorTip, RuntimeError},
    lexer::tokens::TokenKind,
    symbols::symbols::TypeSymbol,
    Position, Span,
};

fn span(start: u32, end: u32) -> Span {
    let file = Rc::new("test.rh".to_string());
    Span {
        start: Position(start, Rc::clone(&file)),
        end: Position(end, file),
    }
}

#[test]
fn test_diagnostic_creation() {
    let diagnostic = Diagnostic::new(DiagnosticKind::BadCharacter { character: '@' }, span(10, 11));

    assert_eq!(diagnostic.get_diagnostic_name(), "BadCharacter");
    assert_eq!(diagnostic.get_position().0, 10);
    assert_eq!(diagnostic.get_span().end.0, 11);
}

#[test]
fn test_undefined_variable_message() {
    let diagnostic = Diagnostic::new(
        DiagnosticKind::UndefinedVariable {
            name: "x".to_string(),
        },
        span(0, 1),
    );

    assert_eq!(diagnostic.message(), "variable 'x' doesn't exist.");
    assert_eq!(diagnostic.to_string(), "variable 'x' doesn't exist.");
}

#[test]
fn test_conversion_messages() {
    let diagnostic = Diagnostic::new(
        DiagnosticKind::CannotConvert {
            from: TypeSymbol::Bool,
            to: TypeSymbol::Int,
        },
        span(0, 1),
    );
    assert_eq!(diagnostic.message(), "cannot convert type <bool> to <int>.");

    let diagnostic = Diagnostic::new(
        DiagnosticKind::CannotConvertImplicitly {
            from: TypeSymbol::String,
            to: TypeSymbol::Int,
        },
        span(0, 1),
    );
    assert_eq!(
        diagnostic.message(),
        "cannot implicitly convert type <string> to <int>. An explicit conversion exists. Are you missing a cast?"
    );
}

#[test]
fn test_operator_messages() {
    let diagnostic = Diagnostic::new(
        DiagnosticKind::UndefinedBinaryOperator {
            operator: "*".to_string(),
            left: TypeSymbol::Int,
            right: TypeSymbol::Bool,
        },
        span(3, 4),
    );
    assert_eq!(
        diagnostic.message(),
        "Binary operator '*' is not defined for types <int> and <bool>"
    );

    let diagnostic = Diagnostic::new(
        DiagnosticKind::UndefinedUnaryOperator {
            operator: "-".to_string(),
            operand: TypeSymbol::Bool,
        },
        span(0, 1),
    );
    assert_eq!(
        diagnostic.message(),
        "Unary operator '-' is not defined for type <bool>"
    );
}

#[test]
fn test_unexpected_token_message() {
    let diagnostic = Diagnostic::new(
        DiagnosticKind::UnexpectedToken {
            actual: TokenKind::EOF,
            expected: TokenKind::CloseCurly,
        },
        span(5, 5),
    );

    assert_eq!(
        diagnostic.message(),
        "unexpected token <EOF>, expected <CloseCurly>."
    );
    assert!(diagnostic.is_unexpected_end_of_file());
}

#[test]
fn test_unexpected_token_mid_input_is_not_end_of_file() {
    let diagnostic = Diagnostic::new(
        DiagnosticKind::UnexpectedExpressionToken {
            actual: TokenKind::CloseParen,
        },
        span(5, 6),
    );

    assert!(!diagnostic.is_unexpected_end_of_file());
}

#[test]
fn test_invalid_number_message() {
    let diagnostic = Diagnostic::new(
        DiagnosticKind::InvalidNumber {
            text: "99999999999".to_string(),
            ty: TypeSymbol::Int,
        },
        span(0, 11),
    );

    assert_eq!(diagnostic.message(), "The number 99999999999 isn't a valid int.");
}

#[test]
fn test_error_tip_none() {
    let diagnostic = Diagnostic::new(DiagnosticKind::BadCharacter { character: '@' }, span(0, 1));

    assert!(matches!(diagnostic.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let diagnostic = Diagnostic::new(
        DiagnosticKind::CannotAssign {
            name: "x".to_string(),
        },
        span(0, 1),
    );

    match diagnostic.get_tip() {
        ErrorTip::Suggestion(tip) => assert!(tip.contains("var")),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_bag_keeps_report_order() {
    let mut bag = DiagnosticBag::new();
    assert!(bag.is_empty());

    bag.report_undefined_variable(&span(0, 1), "a");
    bag.report_cannot_assign(&span(4, 5), "b");
    bag.report_all_paths_must_return(&span(9, 10), "f");

    assert_eq!(bag.len(), 3);

    let messages: Vec<String> = bag.iter().map(|d| d.message()).collect();
    assert_eq!(
        messages,
        vec![
            "variable 'a' doesn't exist.",
            "cannot assign to variable 'b' because it is read-only.",
            "Not all code paths return a value for function 'f'.",
        ]
    );
}

#[test]
fn test_bag_extend() {
    let mut first = DiagnosticBag::new();
    first.report_invalid_return(&span(0, 6));

    let mut second = DiagnosticBag::new();
    second.report_invalid_break_or_continue(&span(0, 5), "break");
    second.extend(first);

    let names: Vec<&str> = second.iter().map(|d| d.get_diagnostic_name()).collect();
    assert_eq!(names, vec!["InvalidBreakOrContinue", "InvalidReturn"]);
    assert_eq!(
        second.into_vec()[0].message(),
        "The keyword 'break' can only be used inside of loops."
    );
}

#[test]
fn test_wrong_argument_messages() {
    let mut bag = DiagnosticBag::new();
    bag.report_wrong_argument_count(&span(0, 1), "add", 2, 3);
    bag.report_wrong_argument_type(&span(0, 1), "text", TypeSymbol::String, TypeSymbol::Bool);

    let messages: Vec<String> = bag.iter().map(|d| d.message()).collect();
    assert_eq!(
        messages,
        vec![
            "function 'add' requires 2 arguments, but was given 3.",
            "parameter 'text' requires a value of type <string>, but was given a value of type <bool>.",
        ]
    );
}

#[test]
fn test_runtime_error_display() {
    assert_eq!(
        RuntimeError::DivideByZero.to_string(),
        "attempted to divide by zero"
    );
    assert_eq!(
        RuntimeError::InvalidConversion {
            value: "abc".to_string(),
            ty: TypeSymbol::Int
        }
        .to_string(),
        "cannot convert 'abc' to <int>"
    );
}
