//! Source-like rendering of the bound tree, plus an indented dump of its
//! node structure.

use std::{
    fmt::{self, Display, Write},
    io,
};

use crate::symbols::symbols::{Symbol, TypeSymbol};

use super::bound_tree::{BoundExpression, BoundNode, BoundStatement};

const INDENT: &str = "    ";

const UNARY_PRECEDENCE: u8 = 6;
const PRIMARY_PRECEDENCE: u8 = 7;

fn precedence(expression: &BoundExpression) -> u8 {
    match expression {
        BoundExpression::Assignment { .. } => 0,
        BoundExpression::Binary { operator, .. } => operator.kind.precedence(),
        BoundExpression::Unary { .. } => UNARY_PRECEDENCE,
        _ => PRIMARY_PRECEDENCE,
    }
}

/// Writes `expression` wrapped in parentheses when it binds looser than
/// `minimum` allows.
fn write_nested(f: &mut dyn Write, expression: &BoundExpression, minimum: u8) -> fmt::Result {
    if precedence(expression) < minimum {
        write!(f, "(")?;
        write_expression(f, expression)?;
        write!(f, ")")
    } else {
        write_expression(f, expression)
    }
}

pub fn write_expression(f: &mut dyn Write, expression: &BoundExpression) -> fmt::Result {
    match expression {
        BoundExpression::Literal(value) => write!(f, "{}", value.to_literal()),
        BoundExpression::Variable(variable) => write!(f, "{}", variable.name),
        BoundExpression::Assignment {
            variable,
            expression,
        } => {
            write!(f, "{} = ", variable.name)?;
            write_expression(f, expression)
        }
        BoundExpression::Unary { operator, operand } => {
            write!(f, "{}", operator.text())?;
            write_nested(f, operand, UNARY_PRECEDENCE)
        }
        BoundExpression::Binary {
            left,
            operator,
            right,
        } => {
            // Left associative: an equal-precedence right operand needs parens
            let own = operator.kind.precedence();
            write_nested(f, left, own)?;
            write!(f, " {} ", operator.text())?;
            write_nested(f, right, own + 1)
        }
        BoundExpression::Call {
            function,
            arguments,
        } => {
            write!(f, "{}(", function.name)?;
            for (i, argument) in arguments.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_expression(f, argument)?;
            }
            write!(f, ")")
        }
        BoundExpression::Conversion { ty, expression } => {
            write!(f, "{}(", ty)?;
            write_expression(f, expression)?;
            write!(f, ")")
        }
        BoundExpression::Error => write!(f, "?"),
    }
}

fn write_indent(f: &mut dyn Write, indent: usize) -> fmt::Result {
    for _ in 0..indent {
        f.write_str(INDENT)?;
    }
    Ok(())
}

/// Blocks stay at the current level, anything else is indented one more.
fn write_nested_statement(
    f: &mut dyn Write,
    statement: &BoundStatement,
    indent: usize,
) -> fmt::Result {
    match statement {
        BoundStatement::Block(_) => write_statement(f, statement, indent),
        _ => write_statement(f, statement, indent + 1),
    }
}

pub fn write_statement(f: &mut dyn Write, statement: &BoundStatement, indent: usize) -> fmt::Result {
    match statement {
        BoundStatement::Block(statements) => {
            write_indent(f, indent)?;
            writeln!(f, "{{")?;
            for statement in statements {
                write_statement(f, statement, indent + 1)?;
            }
            write_indent(f, indent)?;
            writeln!(f, "}}")
        }
        BoundStatement::Expression(expression) => {
            write_indent(f, indent)?;
            write_expression(f, expression)?;
            writeln!(f)
        }
        BoundStatement::VariableDeclaration {
            variable,
            initializer,
        } => {
            write_indent(f, indent)?;
            let keyword = if variable.is_read_only { "let" } else { "var" };
            write!(f, "{} {} = ", keyword, variable.name)?;
            write_expression(f, initializer)?;
            writeln!(f)
        }
        BoundStatement::If {
            condition,
            then_statement,
            else_statement,
        } => {
            write_indent(f, indent)?;
            write!(f, "if ")?;
            write_expression(f, condition)?;
            writeln!(f)?;
            write_nested_statement(f, then_statement, indent)?;

            if let Some(else_statement) = else_statement {
                write_indent(f, indent)?;
                writeln!(f, "else")?;
                write_nested_statement(f, else_statement, indent)?;
            }
            Ok(())
        }
        BoundStatement::While {
            condition, body, ..
        } => {
            write_indent(f, indent)?;
            write!(f, "while ")?;
            write_expression(f, condition)?;
            writeln!(f)?;
            write_nested_statement(f, body, indent)
        }
        BoundStatement::For {
            variable,
            lower_bound,
            upper_bound,
            body,
            ..
        } => {
            write_indent(f, indent)?;
            write!(f, "for {} = ", variable.name)?;
            write_expression(f, lower_bound)?;
            write!(f, " to ")?;
            write_expression(f, upper_bound)?;
            writeln!(f)?;
            write_nested_statement(f, body, indent)
        }
        BoundStatement::Goto(label) => {
            write_indent(f, indent)?;
            writeln!(f, "goto {}", label)
        }
        BoundStatement::ConditionalGoto {
            label,
            condition,
            jump_if_true,
        } => {
            write_indent(f, indent)?;
            let keyword = if *jump_if_true { "if" } else { "unless" };
            write!(f, "goto {} {} ", label, keyword)?;
            write_expression(f, condition)?;
            writeln!(f)
        }
        BoundStatement::Label(label) => {
            // Labels hang one level out so jump targets stand out
            write_indent(f, indent.saturating_sub(1))?;
            writeln!(f, "{}:", label)
        }
        BoundStatement::Return(expression) => {
            write_indent(f, indent)?;
            write!(f, "return")?;
            if let Some(expression) = expression {
                write!(f, " ")?;
                write_expression(f, expression)?;
            }
            writeln!(f)
        }
    }
}

impl Display for BoundExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expression(f, self)
    }
}

impl Display for BoundStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_statement(f, self, 0)
    }
}

/// One-line description of a node for the tree dump.
fn describe(node: BoundNode<'_>) -> String {
    match node {
        BoundNode::Expression(expression) => match expression {
            BoundExpression::Literal(value) => {
                format!("LiteralExpression {}: {}", value.to_literal(), value.ty())
            }
            BoundExpression::Variable(variable) => {
                format!("VariableExpression {}", Symbol::Variable(variable.clone()))
            }
            BoundExpression::Assignment { variable, .. } => {
                format!("AssignmentExpression {}", Symbol::Variable(variable.clone()))
            }
            BoundExpression::Unary { operator, .. } => {
                format!("UnaryExpression {}: {}", operator.text(), operator.ty)
            }
            BoundExpression::Binary { operator, .. } => {
                format!("BinaryExpression {}: {}", operator.text(), operator.ty)
            }
            BoundExpression::Call { function, .. } => {
                format!("CallExpression {}", Symbol::Function(function.clone()))
            }
            BoundExpression::Conversion { ty, .. } => format!("ConversionExpression {}", ty),
            BoundExpression::Error => format!("ErrorExpression {}", TypeSymbol::Error),
        },
        BoundNode::Statement(statement) => match statement {
            BoundStatement::Block(_) => String::from("BlockStatement"),
            BoundStatement::Expression(_) => String::from("ExpressionStatement"),
            BoundStatement::VariableDeclaration { variable, .. } => {
                format!("VariableDeclaration {}", Symbol::Variable(variable.clone()))
            }
            BoundStatement::If { .. } => String::from("IfStatement"),
            BoundStatement::While {
                break_label,
                continue_label,
                ..
            } => format!("WhileStatement {} {}", break_label, continue_label),
            BoundStatement::For {
                variable,
                break_label,
                continue_label,
                ..
            } => format!(
                "ForStatement {} {} {}",
                variable.name, break_label, continue_label
            ),
            BoundStatement::Goto(label) => format!("GotoStatement {}", label),
            BoundStatement::ConditionalGoto {
                label,
                jump_if_true,
                ..
            } => format!("ConditionalGotoStatement {} {}", label, jump_if_true),
            BoundStatement::Label(label) => format!("LabelStatement {}", label),
            BoundStatement::Return(_) => String::from("ReturnStatement"),
        },
    }
}

/// Writes an indented `├──`/`└──` dump of `node` and everything below it.
pub fn write_tree(writer: &mut dyn io::Write, node: BoundNode<'_>) -> io::Result<()> {
    write_tree_node(writer, node, "", true)
}

fn write_tree_node(
    writer: &mut dyn io::Write,
    node: BoundNode<'_>,
    indent: &str,
    is_last: bool,
) -> io::Result<()> {
    let marker = if is_last { "└──" } else { "├──" };
    writeln!(writer, "{}{}{}", indent, marker, describe(node))?;

    let indent = format!("{}{}", indent, if is_last { "    " } else { "│   " });
    let children = node.children();
    let count = children.len();

    for (i, child) in children.into_iter().enumerate() {
        write_tree_node(writer, child, &indent, i + 1 == count)?;
    }

    Ok(())
}
