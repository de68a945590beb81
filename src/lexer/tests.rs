//! Unit tests for the lexer module.
//!
//! Covers keywords and identifiers, the three number literal shapes,
//! strings with doubled-quote escapes, operators, comments and the
//! recovery path for bad input.

use super::{
    lexer::{parse_number, tokenize},
    tokens::{Token, TokenKind},
};
use crate::{symbols::symbols::TypeSymbol, value::Value};

fn lex(source: &str) -> Vec<Token> {
    let (tokens, diagnostics) = tokenize(source, Some("test.rh".to_string()));
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);
    tokens
}

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).iter().map(|t| t.kind).collect()
}

#[test]
fn test_tokenize_keywords() {
    assert_eq!(
        kinds("true false var let if else while for to function break continue return"),
        vec![
            TokenKind::True,
            TokenKind::False,
            TokenKind::Var,
            TokenKind::Let,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::For,
            TokenKind::To,
            TokenKind::Function,
            TokenKind::Break,
            TokenKind::Continue,
            TokenKind::Return,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = lex("foo bar_1 _under int returned");

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[1].value, "bar_1");
    assert_eq!(tokens[2].value, "_under");
    // type names are ordinary identifiers
    assert_eq!(tokens[3].kind, TokenKind::Identifier);
    assert_eq!(tokens[4].kind, TokenKind::Identifier);
    assert_eq!(tokens[4].value, "returned");
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let tokens = lex("42 3.14 2.5f 7f 0");

    let values: Vec<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(values, vec!["42", "3.14", "2.5f", "7f", "0", "EOF"]);
    assert!(tokens[..5].iter().all(|t| t.kind == TokenKind::Number));
}

#[test]
fn test_parse_number_shapes() {
    assert_eq!(parse_number("42"), Ok(Value::Int(42)));
    assert_eq!(parse_number("1.5"), Ok(Value::Double(1.5)));
    assert_eq!(parse_number("1.5f"), Ok(Value::Float(1.5)));
    assert_eq!(parse_number("3f"), Ok(Value::Float(3.0)));
    assert_eq!(parse_number("99999999999"), Err(TypeSymbol::Int));
}

#[test]
fn test_invalid_number_is_reported() {
    let (tokens, diagnostics) = tokenize("99999999999", None);

    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics.iter().next().unwrap().message(),
        "The number 99999999999 isn't a valid int."
    );
}

#[test]
fn test_tokenize_strings() {
    let tokens = lex(r#""hello" "two words" """#);

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].value, "two words");
    assert_eq!(tokens[2].kind, TokenKind::String);
    assert_eq!(tokens[2].value, "");
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_escaped_quote_in_string() {
    let tokens = lex(r#""say ""hi""""#);

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, r#"say "hi""#);
    assert_eq!(tokens[0].span.start.0, 0);
    assert_eq!(tokens[0].span.end.0, 12);
}

#[test]
fn test_unterminated_string() {
    let (tokens, diagnostics) = tokenize("\"abc\nx", None);

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "abc");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);

    let diagnostic = diagnostics.iter().next().unwrap();
    assert_eq!(diagnostic.message(), "unterminated string literal.");
    assert_eq!(diagnostic.get_span().start.0, 0);
    assert_eq!(diagnostic.get_span().end.0, 1);
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("+ - * / % ! ~ & && | || ^ << >> = == != < <= > >="),
        vec![
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Not,
            TokenKind::Tilde,
            TokenKind::Ampersand,
            TokenKind::And,
            TokenKind::Pipe,
            TokenKind::Or,
            TokenKind::Hat,
            TokenKind::LessLess,
            TokenKind::GreaterGreater,
            TokenKind::Assignment,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::LessEquals,
            TokenKind::Greater,
            TokenKind::GreaterEquals,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("( ) { } , :"),
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::Comma,
            TokenKind::Colon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_operators_without_spaces() {
    assert_eq!(
        kinds("a<=b&&!c"),
        vec![
            TokenKind::Identifier,
            TokenKind::LessEquals,
            TokenKind::Identifier,
            TokenKind::And,
            TokenKind::Not,
            TokenKind::Identifier,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_comments() {
    let tokens = lex("var x = 1 // the answer\nx");

    assert_eq!(tokens.len(), 6);
    assert_eq!(tokens[3].value, "1");
    assert_eq!(tokens[4].kind, TokenKind::Identifier);
    assert_eq!(tokens[4].value, "x");
}

#[test]
fn test_tokenize_function_declaration() {
    assert_eq!(
        kinds("function add(a: int, b: int): int { return a + b }"),
        vec![
            TokenKind::Function,
            TokenKind::Identifier,
            TokenKind::OpenParen,
            TokenKind::Identifier,
            TokenKind::Colon,
            TokenKind::Identifier,
            TokenKind::Comma,
            TokenKind::Identifier,
            TokenKind::Colon,
            TokenKind::Identifier,
            TokenKind::CloseParen,
            TokenKind::Colon,
            TokenKind::Identifier,
            TokenKind::OpenCurly,
            TokenKind::Return,
            TokenKind::Identifier,
            TokenKind::Plus,
            TokenKind::Identifier,
            TokenKind::CloseCurly,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_token_positions() {
    let tokens = lex("var  answer\n= 42");

    assert_eq!(tokens[0].span.start.0, 0);
    assert_eq!(tokens[0].span.end.0, 3);
    assert_eq!(tokens[1].span.start.0, 5);
    assert_eq!(tokens[1].span.end.0, 11);
    assert_eq!(tokens[2].span.start.0, 12);
    assert_eq!(tokens[3].span.start.0, 14);
    assert_eq!(tokens[4].span.start.0, 16);
    assert_eq!(*tokens[0].span.start.1, "test.rh");
}

#[test]
fn test_bad_character_is_skipped() {
    let (tokens, diagnostics) = tokenize("1 # 2 @", None);

    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TokenKind::Number, TokenKind::Number, TokenKind::EOF]);

    let messages: Vec<String> = diagnostics.iter().map(|d| d.message()).collect();
    assert_eq!(
        messages,
        vec!["bad character input: '#'", "bad character input: '@'"]
    );
}

#[test]
fn test_bad_multibyte_character() {
    let (tokens, diagnostics) = tokenize("a é b", None);

    assert_eq!(tokens.len(), 3);
    let diagnostic = diagnostics.iter().next().unwrap();
    assert_eq!(diagnostic.get_span().start.0, 2);
    assert_eq!(diagnostic.get_span().end.0, 4);
}

#[test]
fn test_default_file_name() {
    let (tokens, _) = tokenize("x", None);
    assert_eq!(*tokens[0].span.start.1, "shell");
}

#[test]
fn test_token_debug() {
    let tokens = lex("x +");
    assert_eq!(tokens[0].debug(), "Identifier (x)");
    assert_eq!(tokens[1].debug(), "Plus ()");
}
