//! Binder module for turning the syntax tree into the bound tree.
//!
//! Binding resolves every name against the scope chain, checks types,
//! picks the operator for each unary and binary expression, and inserts
//! conversions. Errors never stop binding: each one is recorded in the
//! diagnostic bag and the offending node is replaced by an error node so
//! the rest of the tree is still checked.
//!
//! Binding runs in two passes:
//! - `bind_global_scope` declares function signatures and binds top-level
//!   statements
//! - `bind_program` binds, lowers and checks every function body

pub mod binder;
pub mod bound_tree;
pub mod conversion;
pub mod operators;
pub mod printer;
pub mod scope;
