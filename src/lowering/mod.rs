//! Lowering module for desugaring structured control flow.
//!
//! `if`, `while` and `for` are rewritten into labels, `goto` and
//! conditional `goto`, then nested blocks are flattened so every function
//! body and the top-level code become one straight statement list.

pub mod lowerer;
