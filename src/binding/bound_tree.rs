use std::{collections::HashMap, fmt::Display, rc::Rc};

use crate::{
    symbols::symbols::{FunctionSymbol, TypeSymbol, VariableSymbol},
    value::Value,
};

use super::operators::{BoundBinaryOperator, BoundUnaryOperator};

/// Jump target used by `Goto`, `ConditionalGoto` and `Label` statements.
/// Two labels are the same target when their names match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(Rc<str>);

impl Label {
    pub fn new(name: &str) -> Self {
        Label(Rc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bound Expression
/// A type-checked expression. Every variant knows its static type.
#[derive(Debug, Clone)]
pub enum BoundExpression {
    Literal(Value),
    Variable(Rc<VariableSymbol>),
    Assignment {
        variable: Rc<VariableSymbol>,
        expression: Box<BoundExpression>,
    },
    Unary {
        operator: &'static BoundUnaryOperator,
        operand: Box<BoundExpression>,
    },
    Binary {
        left: Box<BoundExpression>,
        operator: &'static BoundBinaryOperator,
        right: Box<BoundExpression>,
    },
    Call {
        function: Rc<FunctionSymbol>,
        arguments: Vec<BoundExpression>,
    },
    Conversion {
        ty: TypeSymbol,
        expression: Box<BoundExpression>,
    },
    /// Stands in for an expression that failed to bind. It has already
    /// been reported, so nothing that consumes it reports again.
    Error,
}

impl BoundExpression {
    pub fn ty(&self) -> TypeSymbol {
        match self {
            BoundExpression::Literal(value) => value.ty(),
            BoundExpression::Variable(variable) => variable.ty,
            BoundExpression::Assignment { variable, .. } => variable.ty,
            BoundExpression::Unary { operator, .. } => operator.ty,
            BoundExpression::Binary { operator, .. } => operator.ty,
            BoundExpression::Call { function, .. } => function.return_type,
            BoundExpression::Conversion { ty, .. } => *ty,
            BoundExpression::Error => TypeSymbol::Error,
        }
    }

    pub fn children(&self) -> Vec<BoundNode<'_>> {
        match self {
            BoundExpression::Literal(_)
            | BoundExpression::Variable(_)
            | BoundExpression::Error => vec![],
            BoundExpression::Assignment { expression, .. }
            | BoundExpression::Conversion { expression, .. } => {
                vec![BoundNode::Expression(expression)]
            }
            BoundExpression::Unary { operand, .. } => vec![BoundNode::Expression(operand)],
            BoundExpression::Binary { left, right, .. } => {
                vec![BoundNode::Expression(left), BoundNode::Expression(right)]
            }
            BoundExpression::Call { arguments, .. } => {
                arguments.iter().map(BoundNode::Expression).collect()
            }
        }
    }
}

/// Bound Statement
/// A type-checked statement. `If`, `While`, `For` and nested `Block`s only
/// exist before lowering; `Goto`, `ConditionalGoto` and `Label` only after.
#[derive(Debug, Clone)]
pub enum BoundStatement {
    Block(Vec<BoundStatement>),
    Expression(BoundExpression),
    VariableDeclaration {
        variable: Rc<VariableSymbol>,
        initializer: BoundExpression,
    },
    If {
        condition: BoundExpression,
        then_statement: Box<BoundStatement>,
        else_statement: Option<Box<BoundStatement>>,
    },
    While {
        condition: BoundExpression,
        body: Box<BoundStatement>,
        break_label: Label,
        continue_label: Label,
    },
    For {
        variable: Rc<VariableSymbol>,
        lower_bound: BoundExpression,
        upper_bound: BoundExpression,
        body: Box<BoundStatement>,
        break_label: Label,
        continue_label: Label,
    },
    Goto(Label),
    ConditionalGoto {
        label: Label,
        condition: BoundExpression,
        jump_if_true: bool,
    },
    Label(Label),
    Return(Option<BoundExpression>),
}

impl BoundStatement {
    pub fn children(&self) -> Vec<BoundNode<'_>> {
        match self {
            BoundStatement::Block(statements) => {
                statements.iter().map(BoundNode::Statement).collect()
            }
            BoundStatement::Expression(expression) => vec![BoundNode::Expression(expression)],
            BoundStatement::VariableDeclaration { initializer, .. } => {
                vec![BoundNode::Expression(initializer)]
            }
            BoundStatement::If {
                condition,
                then_statement,
                else_statement,
            } => {
                let mut children = vec![
                    BoundNode::Expression(condition),
                    BoundNode::Statement(then_statement),
                ];
                if let Some(else_statement) = else_statement {
                    children.push(BoundNode::Statement(else_statement));
                }
                children
            }
            BoundStatement::While {
                condition, body, ..
            } => vec![BoundNode::Expression(condition), BoundNode::Statement(body)],
            BoundStatement::For {
                lower_bound,
                upper_bound,
                body,
                ..
            } => vec![
                BoundNode::Expression(lower_bound),
                BoundNode::Expression(upper_bound),
                BoundNode::Statement(body),
            ],
            BoundStatement::ConditionalGoto { condition, .. } => {
                vec![BoundNode::Expression(condition)]
            }
            BoundStatement::Return(Some(expression)) => vec![BoundNode::Expression(expression)],
            BoundStatement::Goto(_) | BoundStatement::Label(_) | BoundStatement::Return(None) => {
                vec![]
            }
        }
    }
}

/// A borrowed node of either kind, used to walk the bound tree without
/// caring whether a child is an expression or a statement.
#[derive(Debug, Clone, Copy)]
pub enum BoundNode<'a> {
    Expression(&'a BoundExpression),
    Statement(&'a BoundStatement),
}

impl<'a> BoundNode<'a> {
    pub fn children(&self) -> Vec<BoundNode<'a>> {
        match self {
            BoundNode::Expression(expression) => expression.children(),
            BoundNode::Statement(statement) => statement.children(),
        }
    }
}

/// A lowered statement list with its label positions resolved. Each label
/// maps to the index just past its `Label` statement.
#[derive(Debug, Clone)]
pub struct BoundBody {
    pub statements: Vec<BoundStatement>,
    labels: HashMap<Label, usize>,
}

impl BoundBody {
    pub fn new(statements: Vec<BoundStatement>) -> Self {
        let labels = statements
            .iter()
            .enumerate()
            .filter_map(|(index, statement)| match statement {
                BoundStatement::Label(label) => Some((label.clone(), index + 1)),
                _ => None,
            })
            .collect();

        BoundBody { statements, labels }
    }

    /// Panics if `label` is not in this body; lowering never produces a
    /// jump to a missing label.
    pub fn label_target(&self, label: &Label) -> usize {
        match self.labels.get(label) {
            Some(index) => *index,
            None => panic!("label '{}' is not defined in this body", label),
        }
    }
}
