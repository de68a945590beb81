//! Unit tests for the control flow graph.

use pretty_assertions::assert_eq;

use super::control_flow::{BlockKind, ControlFlowGraph};
use crate::{
    binding::{
        binder::BoundProgram,
        bound_tree::{BoundExpression, BoundStatement, Label},
    },
    compilation::Compilation,
    parser::parser::SyntaxTree,
    value::Value,
};

fn program(source: &str) -> BoundProgram {
    Compilation::new(vec![SyntaxTree::parse(source, None)]).program()
}

fn function_returns(source: &str) -> bool {
    let program = program(source);
    let function = program.function_by_name("f").expect("f is bound");
    ControlFlowGraph::all_paths_return(&function.body.statements)
}

fn dot(statements: &[BoundStatement]) -> String {
    let mut out = Vec::new();
    ControlFlowGraph::create(statements)
        .write_to(&mut out)
        .expect("write to a Vec");
    String::from_utf8(out).expect("utf-8")
}

#[test]
fn test_empty_body() {
    let graph = ControlFlowGraph::create(&[]);
    assert_eq!(graph.blocks.len(), 2);
    assert_eq!(graph.blocks[graph.start()].kind, BlockKind::Start);
    assert_eq!(graph.blocks[graph.end()].kind, BlockKind::End);
    assert_eq!(graph.branches.len(), 1);
    assert!(!ControlFlowGraph::all_paths_return(&[]));
}

#[test]
fn test_if_without_else_falls_through() {
    assert!(!function_returns(
        "function f(n: int): bool { if n > 10 return true }"
    ));
}

#[test]
fn test_if_else_both_return() {
    assert!(function_returns(
        "function f(n: int): bool { if n > 10 return true else return false }"
    ));
}

#[test]
fn test_return_after_loop() {
    assert!(function_returns(
        "function f(n: int): int { var i = 0 while i < n i = i + 1 return i }"
    ));
}

#[test]
fn test_infinite_loop_never_reaches_end() {
    assert!(function_returns("function f(): int { while true { } }"));
}

#[test]
fn test_partition_at_labels_and_jumps() {
    let program = program("var x = 1\nif x > 0 x = 2 else x = 3");
    let graph = ControlFlowGraph::create(&program.statements.statements);

    // [var x, gotoFalse] [x = 2, goto] [Label1, x = 3] [Label2]
    assert_eq!(graph.blocks.len(), 6);
    let sizes: Vec<usize> = graph.blocks.iter().map(|block| block.statements.len()).collect();
    assert_eq!(sizes, vec![0, 2, 2, 2, 1, 0]);

    // the conditional jump has two guarded edges
    let guarded: Vec<_> = graph.blocks[1]
        .outgoing
        .iter()
        .map(|branch| graph.branches[*branch].condition.is_some())
        .collect();
    assert_eq!(guarded, vec![true, true]);
}

#[test]
fn test_unreachable_blocks_are_removed() {
    let label = Label::new("end");
    let statements = vec![
        BoundStatement::Goto(label.clone()),
        BoundStatement::Expression(BoundExpression::Literal(Value::Int(1))),
        BoundStatement::Label(label),
        BoundStatement::Return(None),
    ];

    let graph = ControlFlowGraph::create(&statements);
    // start, goto, label+return, end
    assert_eq!(graph.blocks.len(), 4);
    for (id, block) in graph.blocks.iter().enumerate() {
        for branch in &block.outgoing {
            assert_eq!(graph.branches[*branch].from, id);
        }
        for branch in &block.incoming {
            assert_eq!(graph.branches[*branch].to, id);
        }
    }
    assert!(ControlFlowGraph::all_paths_return(&statements));
}

#[test]
fn test_constant_conditions_prune_edges() {
    let label = Label::new("top");
    let statements = vec![
        BoundStatement::Label(label.clone()),
        BoundStatement::ConditionalGoto {
            label,
            condition: BoundExpression::Literal(Value::Bool(true)),
            jump_if_true: true,
        },
    ];

    let graph = ControlFlowGraph::create(&statements);
    // the fall-through edge can never fire, so End is unreachable
    assert!(graph.blocks[graph.end()].incoming.is_empty());
    assert!(graph
        .branches
        .iter()
        .all(|branch| branch.condition.is_none()));
}

#[test]
fn test_graphviz_output() {
    let program = program("var x = 1\nif x > 0 x = 2");
    let output = dot(&program.statements.statements);

    assert!(output.starts_with("digraph G {\n"));
    assert!(output.ends_with("}\n"));
    assert!(output.contains("    N0 [label = \"<Start>\", shape = box]\n"));
    assert!(output.contains("[label = \"var x = 1\\lgoto Label1 unless x > 0\", shape = box]"));
    assert!(output.contains("N1 -> N3 [label = \"!(x > 0)\"]"));
    assert!(output.contains("N1 -> N2 [label = \"x > 0\"]"));
}

#[test]
fn test_graphviz_escapes_quotes() {
    let statements = vec![BoundStatement::Expression(BoundExpression::Literal(
        Value::from("say \"hi\""),
    ))];
    let output = dot(&statements);
    assert!(output.contains("[label = \"\\\"say \\\"\\\"hi\\\"\\\"\\\"\", shape = box]"));
}
