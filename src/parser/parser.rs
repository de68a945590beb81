//! Parser implementation for building the syntax tree.
//!
//! This module contains the main Parser struct, the `SyntaxTree` entry
//! point and the top-level `parse` loop. Expressions are parsed with a
//! Pratt parser driven by lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence

use std::{collections::HashMap, rc::Rc};

use tracing::debug;

use crate::{
    ast::ast::{CompilationUnit, Member},
    errors::errors::{Diagnostic, DiagnosticKind},
    lexer::{
        lexer::tokenize,
        tokens::{Token, TokenKind},
    },
    line_index, Span,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::{parse_fn_decl_stmt, parse_stmt},
};

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// The list of tokens to parse, always ending with `EOF`
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The source text the tokens came from
    source: Rc<String>,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for infix binding powers (precedence)
    binding_power_lookup: BPLookup,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, source: Rc<String>) -> Self {
        Parser {
            tokens,
            pos: 0,
            source,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the kind of the token `offset` places ahead, clamped to `EOF`.
    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        self.tokens[index].kind
    }

    /// Advances to the next token and returns the previous token. Never
    /// moves past `EOF`.
    pub fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Consumes the current token if it has the expected kind.
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise an
    /// `UnexpectedToken` diagnostic located at the current token.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Diagnostic> {
        let token = self.current_token();
        if token.kind != expected_kind {
            Err(Diagnostic::new(
                DiagnosticKind::UnexpectedToken {
                    actual: token.kind,
                    expected: expected_kind,
                },
                token.span.clone(),
            ))
        } else {
            Ok(self.advance())
        }
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// True if both tokens start on the same source line.
    pub fn on_same_line(&self, first: &Token, second: &Token) -> bool {
        line_index(&self.source, first.span.start.0) == line_index(&self.source, second.span.start.0)
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token. A token
    /// may have both a NUD and a LED handler, e.g. `-`.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }
}

/// Parses a token stream into a compilation unit.
///
/// Parsing stops at the first syntax error. The members parsed before it
/// are kept and the error is returned alongside them.
pub fn parse(tokens: Vec<Token>, source: Rc<String>) -> (CompilationUnit, Option<Diagnostic>) {
    let mut parser = Parser::new(tokens, source);
    create_token_lookups(&mut parser);

    let start = parser.current_token().span.start.clone();
    let mut members = vec![];
    let mut error = None;

    while parser.has_tokens() {
        let member = if parser.current_token_kind() == TokenKind::Function {
            parse_fn_decl_stmt(&mut parser).map(|decl| Member::Function(Rc::new(decl)))
        } else {
            parse_stmt(&mut parser).map(Member::GlobalStatement)
        };

        match member {
            Ok(member) => members.push(member),
            Err(diagnostic) => {
                error = Some(diagnostic);
                break;
            }
        }
    }

    let unit = CompilationUnit {
        members,
        span: Span {
            start,
            end: parser.current_token().span.end.clone(),
        },
    };

    (unit, error)
}

/// A parsed source text together with every lexing and parsing
/// diagnostic found in it.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub text: Rc<String>,
    pub file: Rc<String>,
    pub root: CompilationUnit,
    pub diagnostics: Vec<Diagnostic>,
}

impl SyntaxTree {
    pub fn parse(text: &str, file: Option<String>) -> SyntaxTree {
        let (tokens, mut diagnostics) = tokenize(text, file);
        let file = tokens
            .last()
            .map(|eof| Rc::clone(&eof.span.start.1))
            .unwrap_or_else(|| Rc::new(String::from("shell")));

        let text = Rc::new(text.to_string());
        let (root, error) = parse(tokens, Rc::clone(&text));
        if let Some(error) = error {
            diagnostics.push(error);
        }

        debug!(
            file = %file,
            members = root.members.len(),
            diagnostics = diagnostics.len(),
            "parsed syntax tree"
        );

        SyntaxTree {
            text,
            file,
            root,
            diagnostics: diagnostics.into_vec(),
        }
    }

    /// True when the text ended in the middle of a construct.
    pub fn is_incomplete(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.is_unexpected_end_of_file())
    }
}
