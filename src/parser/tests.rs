//! Unit tests for the parser module.
//!
//! Expressions are checked through a fully parenthesized rendering so
//! precedence and associativity are visible at a glance.

use pretty_assertions::assert_eq;

use super::parser::SyntaxTree;
use crate::{
    ast::{
        ast::{CompilationUnit, Member},
        expressions::Expr,
        statements::Stmt,
    },
    value::Value,
};

fn parse_ok(source: &str) -> CompilationUnit {
    let tree = SyntaxTree::parse(source, Some("test.rh".to_string()));
    assert!(
        tree.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        tree.diagnostics
    );
    tree.root
}

fn first_statement(source: &str) -> Stmt {
    match parse_ok(source).members.into_iter().next() {
        Some(Member::GlobalStatement(stmt)) => stmt,
        other => panic!("expected a global statement, found {:?}", other),
    }
}

fn render(expr: &Expr) -> String {
    match expr {
        Expr::Literal(literal) => literal.value.to_literal(),
        Expr::Name(name) => name.identifier.value.clone(),
        Expr::Unary(unary) => format!("({}{})", unary.operator.value, render(&unary.operand)),
        Expr::Binary(binary) => format!(
            "({} {} {})",
            render(&binary.left),
            binary.operator.value,
            render(&binary.right)
        ),
        Expr::Parenthesized(inner) => format!("[{}]", render(&inner.expression)),
        Expr::Assignment(assignment) => format!(
            "({} = {})",
            assignment.identifier.value,
            render(&assignment.value)
        ),
        Expr::Call(call) => format!(
            "{}({})",
            call.identifier.value,
            call.arguments.iter().map(render).collect::<Vec<_>>().join(", ")
        ),
    }
}

fn parse_expression(source: &str) -> String {
    match first_statement(source) {
        Stmt::Expression(stmt) => render(&stmt.expression),
        other => panic!("expected an expression statement, found {:?}", other),
    }
}

#[test]
fn test_parse_variable_declaration() {
    match first_statement("var x = 42") {
        Stmt::VarDecl(decl) => {
            assert_eq!(decl.identifier.value, "x");
            assert!(!decl.is_read_only());
            assert!(decl.type_clause.is_none());
            match decl.initializer {
                Expr::Literal(literal) => assert_eq!(literal.value, Value::Int(42)),
                other => panic!("expected literal, found {:?}", other),
            }
        }
        other => panic!("expected declaration, found {:?}", other),
    }
}

#[test]
fn test_parse_let_with_type_clause() {
    match first_statement("let ratio: float = 1") {
        Stmt::VarDecl(decl) => {
            assert!(decl.is_read_only());
            assert_eq!(decl.type_clause.unwrap().identifier.value, "float");
        }
        other => panic!("expected declaration, found {:?}", other),
    }
}

#[test]
fn test_precedence() {
    assert_eq!(parse_expression("1 + 2 * 3"), "(1 + (2 * 3))");
    assert_eq!(parse_expression("1 * 2 + 3"), "((1 * 2) + 3)");
    assert_eq!(parse_expression("a || b && c"), "(a || (b && c))");
    assert_eq!(parse_expression("a == 1 && b < 2"), "((a == 1) && (b < 2))");
    assert_eq!(parse_expression("1 + 2 == 3"), "((1 + 2) == 3)");
    assert_eq!(parse_expression("a | b * c"), "(a | (b * c))");
}

#[test]
fn test_left_associativity() {
    assert_eq!(parse_expression("a - b - c"), "((a - b) - c)");
    assert_eq!(parse_expression("a / b % c"), "((a / b) % c)");
}

#[test]
fn test_unary_binds_tighter_than_binary() {
    assert_eq!(parse_expression("-a * b"), "((-a) * b)");
    assert_eq!(parse_expression("!a && b"), "((!a) && b)");
    assert_eq!(parse_expression("~-a"), "(~(-a))");
}

#[test]
fn test_parenthesized() {
    assert_eq!(parse_expression("(1 + 2) * 3"), "([(1 + 2)] * 3)");
}

#[test]
fn test_assignment_is_right_associative() {
    assert_eq!(parse_expression("a = b = 1 + 2"), "(a = (b = (1 + 2)))");
}

#[test]
fn test_assignment_requires_name() {
    let tree = SyntaxTree::parse("1 = 2", None);

    assert_eq!(tree.diagnostics.len(), 1);
    assert_eq!(tree.diagnostics[0].message(), "unexpected token <Assignment>.");
}

#[test]
fn test_parse_calls() {
    assert_eq!(parse_expression("add(1, 2 * 3)"), "add(1, (2 * 3))");
    assert_eq!(parse_expression("input()"), "input()");
    assert_eq!(parse_expression("print(string(f(1)))"), "print(string(f(1)))");
}

#[test]
fn test_literals() {
    assert_eq!(parse_expression("true"), "true");
    assert_eq!(parse_expression("1.5"), "1.5");
    assert_eq!(parse_expression("1.5f"), "1.5f");
    assert_eq!(parse_expression("\"a\"\"b\""), "\"a\"\"b\"");
}

#[test]
fn test_statements_need_no_separator() {
    match first_statement("{ var a = 0 if a == 0 a = 10 a }") {
        Stmt::Block(block) => {
            assert_eq!(block.body.len(), 3);
            match &block.body[1] {
                Stmt::If(stmt) => {
                    assert_eq!(render(&stmt.condition), "(a == 0)");
                    assert!(stmt.else_body.is_none());
                }
                other => panic!("expected if, found {:?}", other),
            }
        }
        other => panic!("expected block, found {:?}", other),
    }
}

#[test]
fn test_parse_if_else() {
    match first_statement("if x > 0 { y = 1 } else y = 2") {
        Stmt::If(stmt) => {
            assert!(matches!(*stmt.then_body, Stmt::Block(_)));
            assert!(matches!(stmt.else_body.as_deref(), Some(Stmt::Expression(_))));
        }
        other => panic!("expected if, found {:?}", other),
    }
}

#[test]
fn test_parse_while_loop() {
    match first_statement("while i < 10 i = i + 1") {
        Stmt::While(stmt) => assert_eq!(render(&stmt.condition), "(i < 10)"),
        other => panic!("expected while, found {:?}", other),
    }
}

#[test]
fn test_parse_for_loop() {
    match first_statement("for i = 1 to n + 1 { }") {
        Stmt::For(stmt) => {
            assert_eq!(stmt.identifier.value, "i");
            assert_eq!(render(&stmt.lower_bound), "1");
            assert_eq!(render(&stmt.upper_bound), "(n + 1)");
        }
        other => panic!("expected for, found {:?}", other),
    }
}

#[test]
fn test_parse_function_declaration() {
    let unit = parse_ok("function add(a: int, b: int): int { return a + b }");

    assert_eq!(unit.members.len(), 1);
    let function = unit.functions().next().unwrap();
    assert_eq!(function.identifier.value, "add");
    assert_eq!(function.parameters.len(), 2);
    assert_eq!(function.parameters[1].identifier.value, "b");
    assert_eq!(function.parameters[1].type_clause.identifier.value, "int");
    assert_eq!(
        function.type_clause.as_ref().unwrap().identifier.value,
        "int"
    );

    match &function.body.body[0] {
        Stmt::Return(stmt) => assert_eq!(render(stmt.value.as_ref().unwrap()), "(a + b)"),
        other => panic!("expected return, found {:?}", other),
    }
}

#[test]
fn test_return_value_must_start_on_same_line() {
    let unit = parse_ok("function f() {\n    return\n    1\n}");
    let function = unit.functions().next().unwrap();

    assert_eq!(function.body.body.len(), 2);
    match &function.body.body[0] {
        Stmt::Return(stmt) => assert!(stmt.value.is_none()),
        other => panic!("expected return, found {:?}", other),
    }
}

#[test]
fn test_return_before_close_curly() {
    let unit = parse_ok("function f() { return }");
    let function = unit.functions().next().unwrap();

    match &function.body.body[0] {
        Stmt::Return(stmt) => assert!(stmt.value.is_none()),
        other => panic!("expected return, found {:?}", other),
    }
}

#[test]
fn test_members_keep_source_order() {
    let unit = parse_ok("var a = 1\nfunction f() { }\nprint(\"x\")");

    assert_eq!(unit.members.len(), 3);
    assert!(matches!(unit.members[0], Member::GlobalStatement(_)));
    assert!(matches!(unit.members[1], Member::Function(_)));
    assert_eq!(unit.global_statements().count(), 2);
}

#[test]
fn test_syntax_error_keeps_earlier_members() {
    let tree = SyntaxTree::parse("var a = 1\nvar = 2", Some("test.rh".to_string()));

    assert_eq!(tree.root.members.len(), 1);
    assert_eq!(tree.diagnostics.len(), 1);
    assert_eq!(
        tree.diagnostics[0].message(),
        "unexpected token <Assignment>, expected <Identifier>."
    );
    assert_eq!(tree.diagnostics[0].get_position().0, 14);
    assert!(!tree.is_incomplete());
}

#[test]
fn test_unexpected_expression_token() {
    let tree = SyntaxTree::parse("1 + )", None);

    assert_eq!(tree.diagnostics[0].message(), "unexpected token <CloseParen>.");
}

#[test]
fn test_incomplete_input() {
    assert!(SyntaxTree::parse("{ var a = 1", None).is_incomplete());
    assert!(SyntaxTree::parse("1 +", None).is_incomplete());
    assert!(SyntaxTree::parse("function f(a: int", None).is_incomplete());
    assert!(!SyntaxTree::parse("{ var a = 1 }", None).is_incomplete());
}

#[test]
fn test_lexer_diagnostics_are_kept() {
    let tree = SyntaxTree::parse("var a = 1 # 2", None);

    assert_eq!(tree.diagnostics.len(), 1);
    assert_eq!(tree.diagnostics[0].message(), "bad character input: '#'");
}
