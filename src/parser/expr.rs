use crate::{
    ast::{
        ast::{NodeId, NodeKind},
        expressions::{AtomKind, BinaryOperator, Expr, UnaryOperator},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{defs::parse_definitions, lookups::BindingPower, parser::Parser};

/// Parses a full expression, including a trailing `{ where ... }` clause.
pub fn parse_expression(parser: &mut Parser) -> Result<NodeId, Error> {
    let expression = parse_expr(parser, BindingPower::Default)?;

    if parser.current_token_kind() == TokenKind::OpenCurly && parser.peek_kind() == TokenKind::Where
    {
        parser.advance();
        parser.advance();

        let defs = parse_definitions(parser)?;
        parser.expect_error(TokenKind::CloseCurly, "expected `}` to close the where clause")?;

        let span = parser.span_from(&parser.node_span(expression));
        return Ok(parser.add(NodeKind::Expr(Expr::Where { defs, expression }), span));
    }

    Ok(expression)
}

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<NodeId, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected());
    };

    let mut left = nud(parser)?;

    // While the next operator binds tighter than the current context, keep extending lhs
    loop {
        let token_kind = parser.current_token_kind();
        let Some(next_bp) = parser.get_bp_lookup().get(&token_kind).copied() else {
            break;
        };

        if next_bp <= bp {
            break;
        }

        let Some(led) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(parser.unexpected());
        };

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let token = parser.current_token().clone();

    match token.kind {
        TokenKind::Integer => {
            if token.value.parse::<i32>().is_err() {
                return Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value },
                    parser.get_position(),
                ));
            }

            parser.advance();
            Ok(parser.add(
                NodeKind::Expr(Expr::Literal {
                    value: token.value,
                    kind: AtomKind::Integer,
                }),
                token.span,
            ))
        }
        TokenKind::Logical => {
            parser.advance();
            Ok(parser.add(
                NodeKind::Expr(Expr::Literal {
                    value: token.value,
                    kind: AtomKind::Logical,
                }),
                token.span,
            ))
        }
        TokenKind::String => {
            parser.advance();
            Ok(parser.add(
                NodeKind::Expr(Expr::Literal {
                    value: token.value,
                    kind: AtomKind::String,
                }),
                token.span,
            ))
        }
        TokenKind::Identifier => {
            parser.advance();

            if parser.current_token_kind() == TokenKind::OpenParen {
                return parse_call_expr(parser, token.value, &token.span);
            }

            Ok(parser.add(
                NodeKind::Expr(Expr::Name { name: token.value }),
                token.span,
            ))
        }
        _ => Err(parser.unexpected()),
    }
}

fn parse_call_expr(
    parser: &mut Parser,
    name: String,
    start: &Span,
) -> Result<NodeId, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut arguments = vec![];

    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            arguments.push(parse_expression(parser)?);

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    parser.expect_error(TokenKind::CloseParen, "expected `,` or `)` in argument list")?;

    let span = parser.span_from(start);
    Ok(parser.add(NodeKind::Expr(Expr::Call { name, arguments }), span))
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOperator> {
    let operator = match kind {
        TokenKind::Or => BinaryOperator::Or,
        TokenKind::And => BinaryOperator::And,
        TokenKind::Equals => BinaryOperator::Eq,
        TokenKind::NotEquals => BinaryOperator::Neq,
        TokenKind::Less => BinaryOperator::Lt,
        TokenKind::Greater => BinaryOperator::Gt,
        TokenKind::LessEquals => BinaryOperator::Leq,
        TokenKind::GreaterEquals => BinaryOperator::Geq,
        TokenKind::Plus => BinaryOperator::Add,
        TokenKind::Dash => BinaryOperator::Sub,
        TokenKind::Star => BinaryOperator::Mul,
        TokenKind::Slash => BinaryOperator::Div,
        TokenKind::Percent => BinaryOperator::Mod,
        _ => return None,
    };

    Some(operator)
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: NodeId,
    bp: BindingPower,
) -> Result<NodeId, Error> {
    let Some(operator) = binary_operator(parser.current_token_kind()) else {
        return Err(parser.unexpected());
    };
    parser.advance();

    let right = parse_expr(parser, bp)?;

    // Comparisons do not associate: `a < b < c` is rejected
    if operator.is_comparison() && parser.current_token_kind().is_relational() {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("comparisons cannot be chained"),
            },
            parser.get_position(),
        ));
    }

    let span = parser.span_from(&parser.node_span(left));
    Ok(parser.add(
        NodeKind::Expr(Expr::Binary {
            left,
            operator,
            right,
        }),
        span,
    ))
}

pub fn parse_index_expr(
    parser: &mut Parser,
    left: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    parser.expect(TokenKind::OpenBracket)?;
    let index = parse_expression(parser)?;
    parser.expect_error(TokenKind::CloseBracket, "expected `]` after array index")?;

    let span = parser.span_from(&parser.node_span(left));
    Ok(parser.add(
        NodeKind::Expr(Expr::Binary {
            left,
            operator: BinaryOperator::Index,
            right: index,
        }),
        span,
    ))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let operator_token = parser.advance();
    let operator = match operator_token.kind {
        TokenKind::Plus => UnaryOperator::Plus,
        TokenKind::Dash => UnaryOperator::Minus,
        _ => UnaryOperator::Not,
    };

    let expression = parse_expr(parser, BindingPower::Unary)?;

    let span = parser.span_from(&operator_token.span);
    Ok(parser.add(
        NodeKind::Expr(Expr::Unary {
            operator,
            expression,
        }),
        span,
    ))
}

/// `(e1, e2, ...)`
pub fn parse_block_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.expect(TokenKind::OpenParen)?.span;

    let mut expressions = vec![];
    loop {
        expressions.push(parse_expression(parser)?);

        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }

    parser.expect_error(TokenKind::CloseParen, "expected `,` or `)` in block")?;

    let span = parser.span_from(&start);
    Ok(parser.add(NodeKind::Expr(Expr::Block { expressions }), span))
}

/// Everything that opens with `{`: assignments and the control-flow forms.
pub fn parse_curly_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span;

    let expr = match parser.current_token_kind() {
        TokenKind::If => parse_if_expr(parser)?,
        TokenKind::While => parse_while_expr(parser)?,
        TokenKind::For => parse_for_expr(parser)?,
        _ => {
            let left = parse_expression(parser)?;
            parser.expect_error(TokenKind::Assignment, "expected `=` in assignment")?;
            let right = parse_expression(parser)?;

            Expr::Binary {
                left,
                operator: BinaryOperator::Assign,
                right,
            }
        }
    };

    parser.expect_error(TokenKind::CloseCurly, "expected `}`")?;

    let span = parser.span_from(&start);
    Ok(parser.add(NodeKind::Expr(expr), span))
}

fn parse_if_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::If)?;
    let condition = parse_expression(parser)?;
    parser.expect_error(TokenKind::Then, "expected `then` after the condition")?;
    let then_expression = parse_expression(parser)?;

    let else_expression = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(parse_expression(parser)?)
    } else {
        None
    };

    Ok(Expr::IfThenElse {
        condition,
        then_expression,
        else_expression,
    })
}

fn parse_while_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::While)?;
    let condition = parse_expression(parser)?;
    parser.expect_error(TokenKind::Colon, "expected `:` after the loop condition")?;
    let body = parse_expression(parser)?;

    Ok(Expr::While { condition, body })
}

fn parse_for_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::For)?;

    let counter_token =
        parser.expect_error(TokenKind::Identifier, "expected the loop counter name")?;
    let counter = parser.add(
        NodeKind::Expr(Expr::Name {
            name: counter_token.value,
        }),
        counter_token.span,
    );

    parser.expect_error(TokenKind::Assignment, "expected `=` after the loop counter")?;
    let low = parse_expression(parser)?;
    parser.expect_error(TokenKind::Comma, "expected `,` after the lower bound")?;
    let high = parse_expression(parser)?;
    parser.expect_error(TokenKind::Comma, "expected `,` after the upper bound")?;
    let step = parse_expression(parser)?;
    parser.expect_error(TokenKind::Colon, "expected `:` after the loop step")?;
    let body = parse_expression(parser)?;

    Ok(Expr::For {
        counter,
        low,
        high,
        step,
        body,
    })
}
