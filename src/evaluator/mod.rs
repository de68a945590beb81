//! Evaluator module for running lowered programs.
//!
//! Each function body is a flat statement list executed with a program
//! counter; jumps look their label up in the body's label index. Calls
//! recurse on the host stack with a fresh frame of locals.

pub mod evaluator;

#[cfg(test)]
mod tests;
