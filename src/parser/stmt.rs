use crate::{
    ast::{
        ast::{FunctionDecl, Parameter, TypeClause},
        statements::{
            BlockStmt, ExpressionStmt, ForStmt, IfStmt, ReturnStmt, Stmt, VarDeclStmt, WhileStmt,
        },
    },
    errors::errors::Diagnostic,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::parser::Parser;

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let handler = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied();
    if let Some(handler) = handler {
        return handler(parser);
    }

    let expression = parse_expr(parser, BindingPower::Default)?;

    Ok(Stmt::Expression(ExpressionStmt {
        span: expression.get_span().clone(),
        expression,
    }))
}

pub fn parse_type_clause(parser: &mut Parser) -> Result<TypeClause, Diagnostic> {
    let colon = parser.expect(TokenKind::Colon)?;
    let identifier = parser.expect(TokenKind::Identifier)?;

    Ok(TypeClause {
        span: colon.span.to(&identifier.span),
        identifier,
    })
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let keyword = parser.advance();
    let identifier = parser.expect(TokenKind::Identifier)?;

    let type_clause = if parser.current_token_kind() == TokenKind::Colon {
        Some(parse_type_clause(parser)?)
    } else {
        None
    };

    parser.expect(TokenKind::Assignment)?;
    let initializer = parse_expr(parser, BindingPower::Default)?;

    Ok(Stmt::VarDecl(VarDeclStmt {
        span: keyword.span.to(initializer.get_span()),
        keyword,
        identifier,
        type_clause,
        initializer,
    }))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let keyword = parser.advance();

    let condition = parse_expr(parser, BindingPower::Default)?;
    let then_body = parse_stmt(parser)?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(Box::new(parse_stmt(parser)?))
    } else {
        None
    };

    let end = match &else_body {
        Some(else_body) => else_body.get_span(),
        None => then_body.get_span(),
    };

    Ok(Stmt::If(IfStmt {
        span: keyword.span.to(end),
        condition,
        then_body: Box::new(then_body),
        else_body,
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let keyword = parser.advance();

    let condition = parse_expr(parser, BindingPower::Default)?;
    let body = parse_stmt(parser)?;

    Ok(Stmt::While(WhileStmt {
        span: keyword.span.to(body.get_span()),
        condition,
        body: Box::new(body),
    }))
}

pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let keyword = parser.advance();

    let identifier = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::Assignment)?;
    let lower_bound = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::To)?;
    let upper_bound = parse_expr(parser, BindingPower::Default)?;
    let body = parse_stmt(parser)?;

    Ok(Stmt::For(ForStmt {
        span: keyword.span.to(body.get_span()),
        identifier,
        lower_bound,
        upper_bound,
        body: Box::new(body),
    }))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    Ok(Stmt::Break(parser.advance()))
}

pub fn parse_continue_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    Ok(Stmt::Continue(parser.advance()))
}

/// `return` only takes a value that starts on the same line, so a bare
/// `return` followed by a statement on the next line stays bare.
pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let keyword = parser.advance();

    let takes_value = !matches!(
        parser.current_token_kind(),
        TokenKind::CloseCurly | TokenKind::EOF
    ) && parser.on_same_line(&keyword, parser.current_token());

    let value = if takes_value {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    let span = match &value {
        Some(value) => keyword.span.to(value.get_span()),
        None => keyword.span.clone(),
    };

    Ok(Stmt::Return(ReturnStmt {
        keyword,
        value,
        span,
    }))
}

pub fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Diagnostic> {
    let open = parser.expect(TokenKind::OpenCurly)?;

    let mut body = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly && parser.has_tokens() {
        body.push(parse_stmt(parser)?);
    }

    let close = parser.expect(TokenKind::CloseCurly)?;

    Ok(BlockStmt {
        body,
        span: open.span.to(&close.span),
    })
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    parse_block(parser).map(Stmt::Block)
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<FunctionDecl, Diagnostic> {
    let keyword = parser.expect(TokenKind::Function)?;
    let identifier = parser.expect(TokenKind::Identifier)?;

    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseParen && parser.has_tokens() {
        if !parameters.is_empty() {
            parser.expect(TokenKind::Comma)?;
        }

        let name = parser.expect(TokenKind::Identifier)?;
        let type_clause = parse_type_clause(parser)?;
        parameters.push(Parameter {
            span: name.span.to(&type_clause.span),
            identifier: name,
            type_clause,
        });
    }

    parser.expect(TokenKind::CloseParen)?;

    let type_clause = if parser.current_token_kind() == TokenKind::Colon {
        Some(parse_type_clause(parser)?)
    } else {
        None
    };

    let body = parse_block(parser)?;

    Ok(FunctionDecl {
        span: keyword.span.to(&body.span),
        identifier,
        parameters,
        type_clause,
        body,
    })
}
