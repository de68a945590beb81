//! Lexical analysis.
//!
//! Converts source text into tokens with a table of anchored regex
//! patterns tried in order. It handles:
//!
//! - Keywords, identifiers, number and string literals, operators
//! - Number literal validation (`int`, `double`, `float`)
//! - Comments and whitespace
//! - Bad characters, which are reported and skipped

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
