//! Diagnostics and runtime errors.
//!
//! Two families live here:
//!
//! - `Diagnostic`s: problems in the user's program found by the lexer,
//!   parser and binder. They are collected in a `DiagnosticBag` and never
//!   stop a stage from running to completion.
//! - `RuntimeError`s: failures while a program that bound cleanly is
//!   executing (I/O, division by zero, bad conversions of runtime strings).

pub mod errors;

#[cfg(test)]
mod tests;
