use crate::{lexer::tokens::Token, Span};

use super::{ast::TypeClause, expressions::Expr};

/// Statement
/// Any statement node of the syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(BlockStmt),
    VarDecl(VarDeclStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Break(Token),
    Continue(Token),
    Return(ReturnStmt),
    Expression(ExpressionStmt),
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::Block(stmt) => &stmt.span,
            Stmt::VarDecl(stmt) => &stmt.span,
            Stmt::If(stmt) => &stmt.span,
            Stmt::While(stmt) => &stmt.span,
            Stmt::For(stmt) => &stmt.span,
            Stmt::Break(keyword) | Stmt::Continue(keyword) => &keyword.span,
            Stmt::Return(stmt) => &stmt.span,
            Stmt::Expression(stmt) => &stmt.span,
        }
    }
}

/// Block Statement
/// `{ ... }`, opening a new scope.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// Variable Declaration Statement
/// `var name[: type] = value` or the read-only `let` form.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub keyword: Token,
    pub identifier: Token,
    pub type_clause: Option<TypeClause>,
    pub initializer: Expr,
    pub span: Span,
}

impl VarDeclStmt {
    pub fn is_read_only(&self) -> bool {
        self.keyword.kind == crate::lexer::tokens::TokenKind::Let
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_body: Box<Stmt>,
    pub else_body: Option<Box<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

/// For Statement
/// `for i = lower to upper body`, both bounds inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub identifier: Token,
    pub lower_bound: Expr,
    pub upper_bound: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub keyword: Token,
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span,
}
