#![allow(clippy::module_inception)]

use std::{io::Write, rc::Rc, sync::Once};

use crate::errors::errors::{Diagnostic, ErrorTip};

pub mod ast;
pub mod binding;
pub mod compilation;
pub mod control_flow;
pub mod errors;
pub mod evaluator;
pub mod lexer;
pub mod lowering;
pub mod macros;
pub mod parser;
pub mod symbols;
pub mod value;

extern crate regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position(pub u32, pub Rc<String>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// Builds a span running from the start of `self` to the end of `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start.clone(),
            end: other.end.clone(),
        }
    }

    pub fn len(&self) -> u32 {
        self.end.0.saturating_sub(self.start.0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call more than once. Nothing is installed unless `RUST_LOG` is
/// set, e.g. `RUST_LOG=rhino=debug` or `RUST_LOG=rhino::evaluator=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}

/// Zero-based index of the line containing `position`.
pub fn line_index(source: &str, position: u32) -> usize {
    let end = (position as usize).min(source.len());
    source.as_bytes()[..end].iter().filter(|b| **b == b'\n').count()
}

/// Returns the 1-based line number, the text of that line and the offset of
/// `position` within it. Positions past the end of the text resolve to the
/// end of the last line.
pub fn get_line_at_position(source: &str, position: u32) -> (usize, String, usize) {
    let pos = position as usize;

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return (line_number, line.to_string(), pos - start);
        }

        start = end;
        line_number += 1;
    }

    match source.split_inclusive('\n').last() {
        Some(last) if !last.ends_with('\n') => (line_number - 1, last.to_string(), last.len()),
        _ => (line_number, String::new(), 0),
    }
}

pub fn display_diagnostic(
    diagnostic: &Diagnostic,
    source: &str,
    out: &mut dyn Write,
) -> std::io::Result<()> {
    /*
        Error: message
        -> main.rh:2
           |
         2 | var a = #
           | --------^
    */

    let position = diagnostic.get_position();
    let (line, line_text, line_pos) = get_line_at_position(source, position.0);

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    if let ErrorTip::None = diagnostic.get_tip() {
        writeln!(out, "Error: {}", diagnostic)?;
    } else {
        writeln!(out, "Error: {} ({})", diagnostic, diagnostic.get_tip())?;
    }
    writeln!(out, "-> {}:{}", position.1, line)?;
    writeln!(out, "{:>padding$}", "|")?;

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    writeln!(out, "{} | {}", line_string, line_text_removed.trim_end())?;

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    writeln!(out, "{:>padding$} {:->arrows$}", "|", "^")
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .count();

    (String::from(&string[start..]), start)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::{
        errors::errors::{Diagnostic, DiagnosticKind},
        Position, Span,
    };

    const SOURCE: &str = "var a = 1\nvar b = #\n    b + a\n";

    #[test]
    fn test_get_line_at_position() {
        let (line_number, line, line_pos) = super::get_line_at_position(SOURCE, 4);
        assert_eq!(line_number, 1);
        assert_eq!(line, "var a = 1\n");
        assert_eq!(line_pos, 4);

        let (line_number, line, line_pos) = super::get_line_at_position(SOURCE, 18);
        assert_eq!(line_number, 2);
        assert_eq!(line, "var b = #\n");
        assert_eq!(line_pos, 8);
    }

    #[test]
    fn test_get_line_past_end() {
        let (line_number, line, line_pos) = super::get_line_at_position("1 +", 3);
        assert_eq!(line_number, 1);
        assert_eq!(line, "1 +");
        assert_eq!(line_pos, 3);
    }

    #[test]
    fn test_line_index() {
        assert_eq!(super::line_index(SOURCE, 0), 0);
        assert_eq!(super::line_index(SOURCE, 10), 1);
        assert_eq!(super::line_index(SOURCE, 24), 2);
        assert_eq!(super::line_index(SOURCE, 1000), 3);
    }

    #[test]
    fn test_display_diagnostic() {
        let file = Rc::new(String::from("main.rh"));
        let diagnostic = Diagnostic::new(
            DiagnosticKind::BadCharacter { character: '#' },
            Span {
                start: Position(18, Rc::clone(&file)),
                end: Position(19, file),
            },
        );

        let mut out = Vec::new();
        super::display_diagnostic(&diagnostic, SOURCE, &mut out).unwrap();
        let rendered = String::from_utf8(out).unwrap();

        assert_eq!(
            rendered,
            "Error: bad character input: '#'\n-> main.rh:2\n  |\n2 | var b = #\n  | --------^\n"
        );
    }

    #[test]
    fn test_span_to() {
        let file = Rc::new(String::from("main.rh"));
        let a = Span {
            start: Position(2, Rc::clone(&file)),
            end: Position(4, Rc::clone(&file)),
        };
        let b = Span {
            start: Position(8, Rc::clone(&file)),
            end: Position(11, file),
        };

        let joined = a.to(&b);
        assert_eq!(joined.start.0, 2);
        assert_eq!(joined.end.0, 11);
        assert_eq!(joined.len(), 9);
    }
}
