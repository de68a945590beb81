use crate::{
    ast::expressions::{
        AssignmentExpr, BinaryExpr, CallExpr, Expr, LiteralExpr, NameExpr, ParenthesizedExpr,
        UnaryExpr,
    },
    errors::errors::{Diagnostic, DiagnosticKind},
    lexer::{lexer::parse_number, tokens::TokenKind},
    value::Value,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Diagnostic> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => {
            return Err(Diagnostic::new(
                DiagnosticKind::UnexpectedExpressionToken { actual: token_kind },
                parser.current_token().span.clone(),
            ))
        }
    };

    let mut left = nud(parser)?;

    // While the next operator binds tighter than the caller, keep extending lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = match parser.get_bp_lookup().get(&token_kind) {
            Some(next_bp) if *next_bp > bp => *next_bp,
            _ => break,
        };
        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => break,
        };

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_literal_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let token = parser.advance();

    let value = match token.kind {
        // invalid numbers were already reported by the lexer
        TokenKind::Number => parse_number(&token.value).unwrap_or(Value::Int(0)),
        TokenKind::True => Value::Bool(true),
        TokenKind::False => Value::Bool(false),
        TokenKind::String => Value::String(token.value.clone()),
        kind => {
            return Err(Diagnostic::new(
                DiagnosticKind::UnexpectedExpressionToken { actual: kind },
                token.span,
            ))
        }
    };

    Ok(Expr::Literal(LiteralExpr {
        value,
        span: token.span,
    }))
}

pub fn parse_name_or_call_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let identifier = parser.expect(TokenKind::Identifier)?;

    if parser.current_token_kind() != TokenKind::OpenParen {
        return Ok(Expr::Name(NameExpr { identifier }));
    }

    parser.advance();

    let mut arguments = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen && parser.has_tokens() {
        if !arguments.is_empty() {
            parser.expect(TokenKind::Comma)?;
        }
        arguments.push(parse_expr(parser, BindingPower::Default)?);
    }

    let close_paren = parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::Call(CallExpr {
        span: identifier.span.to(&close_paren.span),
        identifier,
        arguments,
        close_paren,
    }))
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: Expr,
    bp: BindingPower,
) -> Result<Expr, Diagnostic> {
    let operator = parser.advance();
    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        span: left.get_span().to(right.get_span()),
        left: Box::new(left),
        operator,
        right: Box::new(right),
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let operator = parser.advance();
    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Unary(UnaryExpr {
        span: operator.span.to(operand.get_span()),
        operator,
        operand: Box::new(operand),
    }))
}

/// Assignment is right associative, so the right-hand side is parsed at
/// the lowest binding power.
pub fn parse_assignment_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Diagnostic> {
    let operator = parser.advance();

    let identifier = match left {
        Expr::Name(name) => name.identifier,
        _ => {
            return Err(Diagnostic::new(
                DiagnosticKind::UnexpectedExpressionToken {
                    actual: operator.kind,
                },
                operator.span,
            ))
        }
    };

    let value = parse_expr(parser, BindingPower::Default)?;

    Ok(Expr::Assignment(AssignmentExpr {
        span: identifier.span.to(value.get_span()),
        identifier,
        value: Box::new(value),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let open = parser.advance();
    let expression = parse_expr(parser, BindingPower::Default)?;
    let close = parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::Parenthesized(ParenthesizedExpr {
        expression: Box::new(expression),
        span: open.span.to(&close.span),
    }))
}
