//! Type parsing implementation.
//!
//! This module handles parsing of type annotations:
//!
//! - Atom types (`integer`, `logical`, `string`)
//! - Named types (references to `typ` definitions)
//! - Array types (`arr[N] element`)
//!
//! Like expressions, types are dispatched through a lookup table keyed by
//! the first token.

use std::collections::HashMap;

use crate::{
    ast::{
        ast::{NodeId, NodeKind},
        expressions::AtomKind,
        types::TypeNode,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/// Type alias for type handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<NodeId, Error>;

/// Type alias for the type lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Initializes the type parsing lookup table.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_nud(TokenKind::IntegerType, parse_atom_type);
    parser.type_nud(TokenKind::LogicalType, parse_atom_type);
    parser.type_nud(TokenKind::StringType, parse_atom_type);
    parser.type_nud(TokenKind::Arr, parse_array_type);
}

pub fn parse_symbol_type(parser: &mut Parser) -> Result<NodeId, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    Ok(parser.add(
        NodeKind::Type(TypeNode::Name { name: token.value }),
        token.span,
    ))
}

pub fn parse_atom_type(parser: &mut Parser) -> Result<NodeId, Error> {
    let token = parser.advance();
    let kind = match token.kind {
        TokenKind::IntegerType => AtomKind::Integer,
        TokenKind::LogicalType => AtomKind::Logical,
        _ => AtomKind::String,
    };

    Ok(parser.add(NodeKind::Type(TypeNode::Atom(kind)), token.span))
}

pub fn parse_array_type(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.expect(TokenKind::Arr)?.span;
    parser.expect_error(TokenKind::OpenBracket, "expected `[` after `arr`")?;

    let size_token = parser.expect_error(TokenKind::Integer, "expected the array size")?;
    let size = size_token.value.parse::<u32>().map_err(|_| {
        Error::new(
            ErrorImpl::NumberParseError {
                token: size_token.value.clone(),
            },
            size_token.span.start.clone(),
        )
    })?;

    parser.expect_error(TokenKind::CloseBracket, "expected `]` after the array size")?;
    let element = parse_type(parser)?;

    let span = parser.span_from(&start);
    Ok(parser.add(NodeKind::Type(TypeNode::Array { size, element }), span))
}

pub fn parse_type(parser: &mut Parser) -> Result<NodeId, Error> {
    let token_kind = parser.current_token_kind();
    let Some(handler) = parser.get_type_nud_lookup().get(&token_kind).copied() else {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("expected a type"),
            },
            parser.get_position(),
        ));
    };

    handler(parser)
}
