//! Control flow graph of a lowered statement list.
//!
//! The binder uses it to check that a function with a return type returns
//! on every path. It can also be written out in Graphviz format.

pub mod control_flow;

#[cfg(test)]
mod tests;
