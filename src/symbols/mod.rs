//! Symbol model shared by every stage after parsing.
//!
//! Types are plain `Copy` values compared by identity. Variables and
//! functions are created once by the binder, carry a unique id, and are
//! shared through `Rc` by the bound tree, the lowerer and the evaluator.

pub mod builtins;
pub mod symbols;
