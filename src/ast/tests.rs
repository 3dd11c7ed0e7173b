//! Unit tests for the AST arena.

use std::rc::Rc;

use super::{
    ast::{Ast, NodeKind},
    definitions::{Def, DefKind, VarDef},
    expressions::{AtomKind, BinaryOperator, Expr},
    types::TypeNode,
};
use crate::{Position, Span};

fn span() -> Span {
    let file = Rc::new(String::from("test.pins"));
    Span::new(Position::new(1, 1, file.clone()), Position::new(1, 2, file))
}

#[test]
fn test_ids_are_sequential() {
    let mut ast = Ast::new();
    let a = ast.add(NodeKind::Type(TypeNode::Atom(AtomKind::Integer)), span());
    let b = ast.add(NodeKind::Type(TypeNode::Atom(AtomKind::Logical)), span());

    assert_eq!(a.index(), 0);
    assert_eq!(b.index(), 1);
    assert_eq!(ast.len(), 2);
    assert_eq!(ast.ids().collect::<Vec<_>>(), vec![a, b]);
}

#[test]
fn test_category_accessors() {
    let mut ast = Ast::new();
    let ty = ast.add(NodeKind::Type(TypeNode::Atom(AtomKind::Integer)), span());
    let var = ast.add(
        NodeKind::Def(Def::Var(VarDef {
            name: String::from("x"),
            ty,
        })),
        span(),
    );

    assert!(ast.type_node(ty).is_some());
    assert!(ast.def(ty).is_none());

    let def = ast.def(var).unwrap();
    assert_eq!(def.name(), "x");
    assert_eq!(def.kind(), DefKind::Variable);
    assert_eq!(def.children(), vec![ty]);
    assert!(ast.expr(var).is_none());
}

#[test]
fn test_root_is_unset_until_parsed() {
    let mut ast = Ast::new();
    assert!(ast.root().is_none());

    let defs = ast.add(NodeKind::Defs(vec![]), span());
    ast.set_root(defs);
    assert_eq!(ast.root(), Some(defs));
}

#[test]
fn test_dump_renders_children_indented() {
    let mut ast = Ast::new();
    let one = ast.add(
        NodeKind::Expr(Expr::Literal {
            value: String::from("1"),
            kind: AtomKind::Integer,
        }),
        span(),
    );
    let x = ast.add(
        NodeKind::Expr(Expr::Name {
            name: String::from("x"),
        }),
        span(),
    );
    let sum = ast.add(
        NodeKind::Expr(Expr::Binary {
            left: x,
            operator: BinaryOperator::Add,
            right: one,
        }),
        span(),
    );

    let dump = ast.dump(sum);
    let lines: Vec<&str> = dump.lines().collect();

    assert_eq!(lines[0], "#2 Binary + [1:1-1:2]");
    assert_eq!(lines[1], "  #1 Name x [1:1-1:2]");
    assert_eq!(lines[2], "  #0 Literal integer \"1\" [1:1-1:2]");
}

#[test]
fn test_def_kind_display() {
    assert_eq!(DefKind::Function.to_string(), "function");
    assert_eq!(DefKind::Variable.to_string(), "variable");
    assert_eq!(DefKind::Type.to_string(), "type");
    assert_eq!(DefKind::Parameter.to_string(), "parameter");
}
