use std::rc::Rc;

use crate::{lexer::tokens::Token, Span};

use super::statements::{BlockStmt, Stmt};

/// Root of one parsed source text.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub members: Vec<Member>,
    pub span: Span,
}

impl CompilationUnit {
    pub fn functions(&self) -> impl Iterator<Item = &Rc<FunctionDecl>> {
        self.members.iter().filter_map(|member| match member {
            Member::Function(function) => Some(function),
            Member::GlobalStatement(_) => None,
        })
    }

    pub fn global_statements(&self) -> impl Iterator<Item = &Stmt> {
        self.members.iter().filter_map(|member| match member {
            Member::GlobalStatement(stmt) => Some(stmt),
            Member::Function(_) => None,
        })
    }
}

/// A top-level item: a function declaration or a statement run as part of
/// the program's top-level code.
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Function(Rc<FunctionDecl>),
    GlobalStatement(Stmt),
}

/// Function Declaration
/// `function name(a: int, b: int)[: type] { ... }`. A missing return type
/// clause means `void`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub identifier: Token,
    pub parameters: Vec<Parameter>,
    pub type_clause: Option<TypeClause>,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub identifier: Token,
    pub type_clause: TypeClause,
    pub span: Span,
}

/// `: name` following a variable, parameter or parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeClause {
    pub identifier: Token,
    pub span: Span,
}
