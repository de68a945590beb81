use crate::{lexer::tokens::Token, value::Value, Span};

/// Expression
/// Any expression node of the syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(LiteralExpr),
    Name(NameExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Parenthesized(ParenthesizedExpr),
    Assignment(AssignmentExpr),
    Call(CallExpr),
}

impl Expr {
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Literal(expr) => &expr.span,
            Expr::Name(expr) => &expr.identifier.span,
            Expr::Unary(expr) => &expr.span,
            Expr::Binary(expr) => &expr.span,
            Expr::Parenthesized(expr) => &expr.span,
            Expr::Assignment(expr) => &expr.span,
            Expr::Call(expr) => &expr.span,
        }
    }
}

// LITERALS

/// Literal Expression
/// A number, string, `true` or `false` written in source.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub value: Value,
    pub span: Span,
}

/// Name Expression
/// A bare identifier used as a value.
#[derive(Debug, Clone, PartialEq)]
pub struct NameExpr {
    pub identifier: Token,
}

// OPERATORS

/// Unary Expression
/// A prefix operator applied to one operand, e.g. `-x` or `!done`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub operator: Token,
    pub operand: Box<Expr>,
    pub span: Span,
}

/// Binary Expression
/// An infix operator applied to two operands.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParenthesizedExpr {
    pub expression: Box<Expr>,
    pub span: Span,
}

/// Assignment Expression
/// `name = value`. The target is always a plain identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpr {
    pub identifier: Token,
    pub value: Box<Expr>,
    pub span: Span,
}

/// Call Expression
/// `name(arguments...)`. Also used for explicit conversions like `int("4")`.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub identifier: Token,
    pub arguments: Vec<Expr>,
    pub close_paren: Token,
    pub span: Span,
}
