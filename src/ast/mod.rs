//! Untyped syntax tree produced by the parser.
//!
//! - ast: compilation units, members, function declarations and type clauses
//! - expressions: expression nodes
//! - statements: statement nodes

pub mod ast;
pub mod expressions;
pub mod statements;
