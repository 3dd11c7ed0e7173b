use crate::{
    ast::{
        ast::{NodeId, NodeKind},
        definitions::{Def, FunDef, Parameter, TypeDef, VarDef},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{expr::parse_expression, parser::Parser, types::parse_type};

/// `definition (';' definition)*`, producing a `Defs` node.
pub fn parse_definitions(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.current_token().span.clone();

    let mut defs = vec![parse_definition(parser)?];
    while parser.current_token_kind() == TokenKind::Semicolon {
        parser.advance();
        defs.push(parse_definition(parser)?);
    }

    let span = parser.span_from(&start);
    Ok(parser.add(NodeKind::Defs(defs), span))
}

pub fn parse_definition(parser: &mut Parser) -> Result<NodeId, Error> {
    let Some(handler) = parser
        .get_def_lookup()
        .get(&parser.current_token_kind())
        .copied()
    else {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("expected a definition (`fun`, `var` or `typ`)"),
            },
            parser.get_position(),
        ));
    };

    handler(parser)
}

/// Parses the `name ':' type` tail shared by variables, types and parameters.
fn parse_typed_name(parser: &mut Parser, what: &str) -> Result<(String, NodeId), Error> {
    let name = parser
        .expect_error(TokenKind::Identifier, &format!("expected {} name", what))?
        .value;
    parser.expect_error(TokenKind::Colon, &format!("expected `:` after {} name", what))?;
    let ty = parse_type(parser)?;

    Ok((name, ty))
}

pub fn parse_type_def(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.expect(TokenKind::Typ)?.span;
    let (name, ty) = parse_typed_name(parser, "type")?;

    let span = parser.span_from(&start);
    Ok(parser.add(NodeKind::Def(Def::Type(TypeDef { name, ty })), span))
}

pub fn parse_var_def(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.expect(TokenKind::Var)?.span;
    let (name, ty) = parse_typed_name(parser, "variable")?;

    let span = parser.span_from(&start);
    Ok(parser.add(NodeKind::Def(Def::Var(VarDef { name, ty })), span))
}

fn parse_parameter(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.current_token().span.clone();
    let (name, ty) = parse_typed_name(parser, "parameter")?;

    let span = parser.span_from(&start);
    Ok(parser.add(NodeKind::Def(Def::Parameter(Parameter { name, ty })), span))
}

pub fn parse_fun_def(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.expect(TokenKind::Fun)?.span;
    let name = parser
        .expect_error(TokenKind::Identifier, "expected function name")?
        .value;

    parser.expect_error(TokenKind::OpenParen, "expected `(` after function name")?;

    let mut parameters = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            parameters.push(parse_parameter(parser)?);

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    parser.expect_error(TokenKind::CloseParen, "expected `,` or `)` in parameter list")?;
    parser.expect_error(TokenKind::Colon, "expected `:` before the return type")?;
    let return_type = parse_type(parser)?;
    parser.expect_error(TokenKind::Assignment, "expected `=` before the function body")?;
    let body = parse_expression(parser)?;

    let span = parser.span_from(&start);
    Ok(parser.add(
        NodeKind::Def(Def::Fun(FunDef {
            name,
            parameters,
            return_type,
            body,
        })),
        span,
    ))
}
