//! Unit tests for the evaluator module.

use std::{collections::HashMap, io::Cursor};

use pretty_assertions::assert_eq;

use super::evaluator::convert;
use crate::{
    compilation::Compilation, errors::errors::RuntimeError, parser::parser::SyntaxTree,
    symbols::symbols::TypeSymbol, value::Value,
};

/// Runs `source` with `input` as standard input, returning the result and
/// everything written to standard output.
fn run_with_input(source: &str, input: &str) -> (Result<Option<Value>, RuntimeError>, String) {
    let compilation = Compilation::new(vec![SyntaxTree::parse(source, None)]);
    let mut globals = HashMap::new();
    let mut input = Cursor::new(input.as_bytes().to_vec());
    let mut output = Vec::new();

    let result = compilation
        .evaluate_with(&mut globals, &mut input, &mut output)
        .map(|result| {
            assert!(
                result.diagnostics.is_empty(),
                "unexpected diagnostics: {:?}",
                result.diagnostics
            );
            result.value
        });

    (result, String::from_utf8(output).expect("utf-8 output"))
}

fn run(source: &str) -> Result<Option<Value>, RuntimeError> {
    run_with_input(source, "").0
}

fn evaluate(source: &str) -> Value {
    match run(source) {
        Ok(Some(value)) => value,
        other => panic!("expected a value, found {:?}", other),
    }
}

#[test]
fn test_precedence() {
    assert_eq!(evaluate("1 + 2 * 3"), Value::Int(7));
}

#[test]
fn test_if_statement() {
    assert_eq!(evaluate("{ var a = 0 if a == 0 a = 10 a }"), Value::Int(10));
    assert_eq!(evaluate("{ var a = 4 if a == 0 a = 10 else a = 20 a }"), Value::Int(20));
}

#[test]
fn test_while_loop() {
    assert_eq!(
        evaluate("{ var i = 10 var result = 0 while i > 0 { result = result + i i = i - 1 } result }"),
        Value::Int(55)
    );
}

#[test]
fn test_for_loop() {
    assert_eq!(
        evaluate("{ var result = 0 for i = 1 to 10 { result = result + i } result }"),
        Value::Int(55)
    );
}

#[test]
fn test_continue_rechecks_condition() {
    assert_eq!(
        evaluate("{ var i = 0 while i < 5 { i = i + 1 if i == 5 continue } i }"),
        Value::Int(5)
    );
}

#[test]
fn test_continue_in_for_still_increments() {
    assert_eq!(
        evaluate("{ var sum = 0 for i = 1 to 10 { if i % 2 == 0 continue sum = sum + i } sum }"),
        Value::Int(25)
    );
}

#[test]
fn test_break_leaves_loop() {
    assert_eq!(
        evaluate("{ var i = 0 while true { i = i + 1 if i == 3 break } i }"),
        Value::Int(3)
    );
}

#[test]
fn test_upper_bound_evaluated_once() {
    assert_eq!(
        evaluate("{ var n = 3 var count = 0 for i = 1 to n { n = n + 1 count = count + 1 } count }"),
        Value::Int(3)
    );
}

#[test]
fn test_arithmetic() {
    assert_eq!(evaluate("7 / 2"), Value::Int(3));
    assert_eq!(evaluate("-7 % 3"), Value::Int(-1));
    assert_eq!(evaluate("2147483647 + 1"), Value::Int(i32::MIN));
    assert_eq!(evaluate("1.5 + 2.25"), Value::Double(3.75));
    assert_eq!(evaluate("3.0f / 2.0f"), Value::Float(1.5));
    assert_eq!(evaluate("\"a\" + \"b\""), Value::from("ab"));
}

#[test]
fn test_bitwise_operators() {
    assert_eq!(evaluate("6 ^ 3"), Value::Int(5));
    assert_eq!(evaluate("6 & 3"), Value::Int(2));
    assert_eq!(evaluate("6 | 3"), Value::Int(7));
    assert_eq!(evaluate("1 << 4"), Value::Int(16));
    assert_eq!(evaluate("-16 >> 2"), Value::Int(-4));
    assert_eq!(evaluate("~0"), Value::Int(-1));
    assert_eq!(evaluate("true ^ true"), Value::Bool(false));
}

#[test]
fn test_comparisons() {
    assert_eq!(evaluate("1 < 2"), Value::Bool(true));
    assert_eq!(evaluate("2 <= 2"), Value::Bool(true));
    assert_eq!(evaluate("1.5 > 2.5"), Value::Bool(false));
    assert_eq!(evaluate("3 >= 4"), Value::Bool(false));
    assert_eq!(evaluate("\"ab\" == \"a\" + \"b\""), Value::Bool(true));
    assert_eq!(evaluate("true != false"), Value::Bool(true));
    assert_eq!(evaluate("!true || false"), Value::Bool(false));
}

#[test]
fn test_logical_operators_evaluate_both_sides() {
    let (result, output) = run_with_input(
        "function f(): bool {\n    println(\"called\")\n    return true\n}\nfalse && f()",
        "",
    );

    assert_eq!(result.expect("runs"), Some(Value::Bool(false)));
    assert_eq!(output, "called\n");
}

#[test]
fn test_return_exits_early() {
    let (result, output) = run_with_input(
        "function f(n: int): int {\n    if n > 0 return 1\n    println(\"after\")\n    return 0\n}\nf(5)",
        "",
    );

    assert_eq!(result.expect("runs"), Some(Value::Int(1)));
    assert_eq!(output, "");
}

#[test]
fn test_recursion() {
    assert_eq!(
        evaluate("function fib(n: int): int {\n    if n < 2 return n\n    return fib(n - 1) + fib(n - 2)\n}\nfib(15)"),
        Value::Int(610)
    );
}

#[test]
fn test_locals_are_per_call() {
    assert_eq!(
        evaluate(
            "function f(n: int): int {\n    var x = n\n    if n > 0 { var y = f(n - 1) }\n    return x\n}\nf(3)"
        ),
        Value::Int(3)
    );
}

#[test]
fn test_functions_update_globals() {
    assert_eq!(
        evaluate("var counter = 0\nfunction bump() { counter = counter + 1 }\nbump()\nbump()\ncounter"),
        Value::Int(2)
    );
}

#[test]
fn test_void_call_has_no_value() {
    let (result, output) = run_with_input("function greet() { println(\"hi\") 42 }\ngreet()", "");
    assert_eq!(result.expect("runs"), None);
    assert_eq!(output, "hi\n");
}

#[test]
fn test_print_and_input() {
    let (result, output) = run_with_input(
        "var name = input()\nprint(\"hi \" + name)\nprintln(\"!\")",
        "Ada\r\nignored\n",
    );

    assert_eq!(result.expect("runs"), None);
    assert_eq!(output, "hi Ada!\n");
}

#[test]
fn test_input_at_end_of_stream() {
    let (result, _) = run_with_input("input()", "");
    assert_eq!(result.expect("runs"), Some(Value::from("")));
}

#[test]
fn test_random() {
    assert_eq!(evaluate("random(3, 4)"), Value::Int(3));
    assert_eq!(evaluate("random(5, 5)"), Value::Int(5));

    for _ in 0..20 {
        let value = evaluate("random(-2, 3)").as_int();
        assert!((-2..3).contains(&value), "{} out of range", value);
    }

    assert!(matches!(
        run("random(5, 1)"),
        Err(RuntimeError::EmptyRandomRange { min: 5, max: 1 })
    ));
}

#[test]
fn test_math_builtins() {
    assert_eq!(evaluate("cos(0.0f)"), Value::Float(1.0));
    assert_eq!(evaluate("sin(0)"), Value::Float(0.0));
    assert_eq!(evaluate("acos(1.0f)"), Value::Float(0.0));
    assert_eq!(evaluate("floor(2.7f)"), Value::Int(2));
    assert_eq!(evaluate("floor(-2.5f)"), Value::Int(-3));
}

#[test]
fn test_divide_by_zero() {
    assert!(matches!(run("var z = 0\n10 / z"), Err(RuntimeError::DivideByZero)));
    assert!(matches!(run("10 % 0"), Err(RuntimeError::DivideByZero)));
    assert_eq!(evaluate("1.0 / 0.0"), Value::Double(f64::INFINITY));
}

#[test]
fn test_conversions() {
    assert_eq!(evaluate("int(\"42\") + 1"), Value::Int(43));
    assert_eq!(evaluate("string(1) + \"x\""), Value::from("1x"));
    assert_eq!(evaluate("string(true)"), Value::from("true"));
    assert_eq!(evaluate("bool(\"false\")"), Value::Bool(false));
    assert_eq!(evaluate("bool(2)"), Value::Bool(true));
    assert_eq!(evaluate("float(\"2.5\")"), Value::Float(2.5));
    assert_eq!(evaluate("int(2.6f)"), Value::Int(3));
    assert_eq!(evaluate("var f: float = 3\nf / 2.0f"), Value::Float(1.5));

    match run("int(\"abc\")") {
        Err(RuntimeError::InvalidConversion { value, ty }) => {
            assert_eq!(value, "abc");
            assert_eq!(ty, TypeSymbol::Int);
        }
        other => panic!("expected an invalid conversion, found {:?}", other),
    }
}

#[test]
fn test_convert_values() {
    assert_eq!(convert(Value::Float(2.5), TypeSymbol::Int).expect("converts"), Value::Int(3));
    assert_eq!(convert(Value::Float(-2.5), TypeSymbol::Int).expect("converts"), Value::Int(-3));
    assert_eq!(convert(Value::from(" 7 "), TypeSymbol::Int).expect("converts"), Value::Int(7));
    assert_eq!(convert(Value::Int(0), TypeSymbol::Bool).expect("converts"), Value::Bool(false));
    assert_eq!(convert(Value::Float(1.5), TypeSymbol::String).expect("converts"), Value::from("1.5"));
    assert_eq!(convert(Value::Int(4), TypeSymbol::Int).expect("converts"), Value::Int(4));
    assert!(convert(Value::from("yes"), TypeSymbol::Bool).is_err());
}

#[test]
fn test_runtime_error_stops_evaluation() {
    let (result, output) = run_with_input("println(\"before\")\n1 / 0\nprintln(\"after\")", "");
    assert!(matches!(result, Err(RuntimeError::DivideByZero)));
    assert_eq!(output, "before\n");
}

#[test]
fn test_diagnostics_prevent_evaluation() {
    let compilation = Compilation::new(vec![SyntaxTree::parse("println(\"x\")\nx * 10", None)]);
    let mut globals = HashMap::new();
    let mut output = Vec::new();

    let result = compilation
        .evaluate_with(&mut globals, &mut Cursor::new(Vec::new()), &mut output)
        .expect("no runtime error");

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.value, None);
    assert!(output.is_empty());
}
