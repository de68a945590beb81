use std::rc::Rc;

use crate::{
    binding::{
        bound_tree::{BoundExpression, BoundStatement, Label},
        operators::BoundBinaryOperator,
    },
    lexer::tokens::TokenKind,
    symbols::symbols::{TypeSymbol, VariableKind, VariableSymbol},
    value::Value,
};

#[derive(Debug, Default)]
pub struct Lowerer {
    label_count: usize,
}

impl Lowerer {
    fn generate_label(&mut self) -> Label {
        self.label_count += 1;
        Label::new(&format!("Label{}", self.label_count))
    }
}

/// Rewrites `statement` so it only contains expression statements,
/// declarations, labels, jumps and returns, then flattens it into a single
/// statement list.
pub fn lower(statement: BoundStatement) -> Vec<BoundStatement> {
    let mut lowerer = Lowerer::default();
    let rewritten = rewrite_statement(&mut lowerer, statement);
    flatten(rewritten)
}

pub fn rewrite_statement(lowerer: &mut Lowerer, statement: BoundStatement) -> BoundStatement {
    match statement {
        BoundStatement::Block(statements) => BoundStatement::Block(
            statements
                .into_iter()
                .map(|statement| rewrite_statement(lowerer, statement))
                .collect(),
        ),
        BoundStatement::If {
            condition,
            then_statement,
            else_statement,
        } => rewrite_if_statement(lowerer, condition, *then_statement, else_statement.map(|s| *s)),
        BoundStatement::While {
            condition,
            body,
            break_label,
            continue_label,
        } => rewrite_while_statement(lowerer, condition, *body, break_label, continue_label),
        BoundStatement::For {
            variable,
            lower_bound,
            upper_bound,
            body,
            break_label,
            continue_label,
        } => {
            let while_statement = rewrite_for_statement(
                lowerer,
                variable,
                lower_bound,
                upper_bound,
                *body,
                break_label,
                continue_label,
            );
            rewrite_statement(lowerer, while_statement)
        }
        other => other,
    }
}

/// if <condition>
///     <then>
///
/// ---->
///
/// gotoFalse <condition> end
/// <then>
/// end:
///
/// and with an else branch:
///
/// gotoFalse <condition> else
/// <then>
/// goto end
/// else:
/// <else>
/// end:
fn rewrite_if_statement(
    lowerer: &mut Lowerer,
    condition: BoundExpression,
    then_statement: BoundStatement,
    else_statement: Option<BoundStatement>,
) -> BoundStatement {
    let then_statement = rewrite_statement(lowerer, then_statement);

    match else_statement {
        None => {
            let end_label = lowerer.generate_label();
            BoundStatement::Block(vec![
                BoundStatement::ConditionalGoto {
                    label: end_label.clone(),
                    condition,
                    jump_if_true: false,
                },
                then_statement,
                BoundStatement::Label(end_label),
            ])
        }
        Some(else_statement) => {
            let else_statement = rewrite_statement(lowerer, else_statement);
            let else_label = lowerer.generate_label();
            let end_label = lowerer.generate_label();

            BoundStatement::Block(vec![
                BoundStatement::ConditionalGoto {
                    label: else_label.clone(),
                    condition,
                    jump_if_true: false,
                },
                then_statement,
                BoundStatement::Goto(end_label.clone()),
                BoundStatement::Label(else_label),
                else_statement,
                BoundStatement::Label(end_label),
            ])
        }
    }
}

/// while <condition>
///     <body>
///
/// ---->
///
/// goto continue
/// body:
/// <body>
/// continue:
/// gotoTrue <condition> body
/// break:
fn rewrite_while_statement(
    lowerer: &mut Lowerer,
    condition: BoundExpression,
    body: BoundStatement,
    break_label: Label,
    continue_label: Label,
) -> BoundStatement {
    let body = rewrite_statement(lowerer, body);
    let body_label = lowerer.generate_label();

    BoundStatement::Block(vec![
        BoundStatement::Goto(continue_label.clone()),
        BoundStatement::Label(body_label.clone()),
        body,
        BoundStatement::Label(continue_label),
        BoundStatement::ConditionalGoto {
            label: body_label,
            condition,
            jump_if_true: true,
        },
        BoundStatement::Label(break_label),
    ])
}

/// for <var> = <lower> to <upper>
///     <body>
///
/// ---->
///
/// {
///     var <var> = <lower>
///     let upperBound = <upper>
///     while (<var> <= upperBound)
///     {
///         <body>
///         continue:
///         <var> = <var> + 1
///     }
/// }
///
/// The returned block still holds a `While` and is rewritten by the caller.
fn rewrite_for_statement(
    lowerer: &mut Lowerer,
    variable: Rc<VariableSymbol>,
    lower_bound: BoundExpression,
    upper_bound: BoundExpression,
    body: BoundStatement,
    break_label: Label,
    continue_label: Label,
) -> BoundStatement {
    let upper_bound_symbol =
        VariableSymbol::new("upperBound", true, TypeSymbol::Int, VariableKind::Local);

    let less_or_equals =
        BoundBinaryOperator::bind(TokenKind::LessEquals, TypeSymbol::Int, TypeSymbol::Int)
            .expect("int <= int is always defined");
    let addition = BoundBinaryOperator::bind(TokenKind::Plus, TypeSymbol::Int, TypeSymbol::Int)
        .expect("int + int is always defined");

    let condition = BoundExpression::Binary {
        left: Box::new(BoundExpression::Variable(Rc::clone(&variable))),
        operator: less_or_equals,
        right: Box::new(BoundExpression::Variable(Rc::clone(&upper_bound_symbol))),
    };

    let increment = BoundStatement::Expression(BoundExpression::Assignment {
        variable: Rc::clone(&variable),
        expression: Box::new(BoundExpression::Binary {
            left: Box::new(BoundExpression::Variable(Rc::clone(&variable))),
            operator: addition,
            right: Box::new(BoundExpression::Literal(Value::Int(1))),
        }),
    });

    let while_body = BoundStatement::Block(vec![
        body,
        BoundStatement::Label(continue_label),
        increment,
    ]);

    let while_statement = BoundStatement::While {
        condition,
        body: Box::new(while_body),
        break_label,
        continue_label: lowerer.generate_label(),
    };

    BoundStatement::Block(vec![
        BoundStatement::VariableDeclaration {
            variable,
            initializer: lower_bound,
        },
        BoundStatement::VariableDeclaration {
            variable: upper_bound_symbol,
            initializer: upper_bound,
        },
        while_statement,
    ])
}

/// Unwraps nested blocks into one list, keeping statement order. Uses an
/// explicit stack so deeply nested input cannot overflow.
pub fn flatten(statement: BoundStatement) -> Vec<BoundStatement> {
    let mut statements = vec![];
    let mut stack = vec![statement];

    while let Some(current) = stack.pop() {
        match current {
            BoundStatement::Block(children) => stack.extend(children.into_iter().rev()),
            other => statements.push(other),
        }
    }

    statements
}
