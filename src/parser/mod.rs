//! Parser module for building the syntax tree.
//!
//! This module transforms a stream of tokens into a `CompilationUnit`.
//! It uses a Pratt parser for expressions with operator precedence and
//! recursive descent for statements and function declarations.
//!
//! Statements need no terminator. A syntax error ends parsing; members
//! completed before it are kept and the error becomes a diagnostic.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;

#[cfg(test)]
mod tests;
