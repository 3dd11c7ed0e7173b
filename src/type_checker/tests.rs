//! Unit tests for the type checker.

use std::rc::Rc;

use super::{
    type_checker::{resolve_definition, type_check, Resolution, TypeChecker},
    types::{AtomType, Type, MAX_OBJECT_SIZE, WORD_SIZE},
};
use crate::{
    ast::{
        ast::{Ast, NodeId},
        definitions::Def,
        expressions::Expr,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    name_checker::name_checker::check_names,
    parser::parser::parse,
    side_table::SideTable,
};

fn parse_source(source: &str) -> Ast {
    let tokens = tokenize(source, Some("test.pins".to_string())).unwrap();
    parse(tokens, Rc::new("test.pins".to_string())).unwrap()
}

fn check(source: &str) -> Result<(Ast, SideTable<Type>), Error> {
    let ast = parse_source(source);
    let definitions = check_names(&ast)?;
    let types = type_check(&ast, &definitions)?;
    Ok((ast, types))
}

fn check_error(source: &str) -> ErrorImpl {
    check(source).unwrap_err().kind().clone()
}

fn definition_named(ast: &Ast, name: &str) -> NodeId {
    ast.ids()
        .find(|id| matches!(ast.def(*id), Some(def) if def.name() == name))
        .unwrap()
}

#[test]
fn test_type_sizes() {
    assert_eq!(Type::int().size_in_bytes(), Some(WORD_SIZE));
    assert_eq!(Type::log().size_in_bytes(), Some(WORD_SIZE));
    assert_eq!(Type::str().size_in_bytes(), Some(WORD_SIZE));
    assert_eq!(Type::void().size_in_bytes(), Some(0));

    let matrix = Type::array(3, Type::array(2, Type::int()));
    assert_eq!(matrix.size_in_bytes(), Some(3 * 2 * WORD_SIZE));
    assert_eq!(matrix.size_in_bytes_as_param(), Some(WORD_SIZE));
    assert_eq!(matrix.to_string(), "arr[3] arr[2] integer");
}

#[test]
fn test_sizes_beyond_address_space() {
    assert_eq!(Type::array(2_000_000_000, Type::int()).size_in_bytes(), None);
    assert_eq!(
        Type::array(600_000_000, Type::array(2, Type::int())).size_in_bytes(),
        None
    );
    assert_eq!(Type::array(u32::MAX, Type::array(u32::MAX, Type::int())).size_in_bytes(), None);

    let largest = MAX_OBJECT_SIZE / WORD_SIZE;
    assert_eq!(
        Type::array(largest, Type::int()).size_in_bytes(),
        Some(largest * WORD_SIZE)
    );
    assert_eq!(Type::array(largest + 1, Type::int()).size_in_bytes(), None);

    // Passed by address whatever their size
    assert_eq!(
        Type::array(2_000_000_000, Type::int()).size_in_bytes_as_param(),
        Some(WORD_SIZE)
    );
}

#[test]
fn test_oversized_array_types_are_rejected() {
    assert!(matches!(
        check_error("var a: arr[2000000000] integer"),
        ErrorImpl::TypeTooLarge { .. }
    ));
    assert!(matches!(
        check_error("fun f(): integer = 0 { where var a: arr[600000000] arr[2] integer }"),
        ErrorImpl::TypeTooLarge { .. }
    ));
    assert!(matches!(
        check_error("typ big: arr[2000000000] integer; fun f(x: big): integer = 0"),
        ErrorImpl::TypeTooLarge { .. }
    ));
    assert!(check("var a: arr[500000000] integer").is_ok());
}

#[test]
fn test_structural_equality() {
    assert_eq!(Type::array(4, Type::log()), Type::array(4, Type::log()));
    assert_ne!(Type::array(4, Type::log()), Type::array(5, Type::log()));
    assert_ne!(Type::Atom(AtomType::Int), Type::Atom(AtomType::Log));
}

#[test]
fn test_function_signature() {
    let (ast, types) = check("fun add(a: integer, b: integer): integer = a + b").unwrap();

    let add = definition_named(&ast, "add");
    assert_eq!(
        types.value_for(add),
        Some(&Type::Function {
            parameters: vec![Type::int(), Type::int()],
            return_type: Box::new(Type::int()),
        })
    );
}

#[test]
fn test_every_expression_is_typed() {
    let source = "var a: arr[10] integer; \
                  fun f(i: integer): integer = ({a[i] = i * 2}, {if a[i] > 3 then print_int(i)}, a[0])";
    let (ast, types) = check(source).unwrap();

    for id in ast.ids() {
        if ast.expr(id).is_some() || ast.def(id).is_some() || ast.type_node(id).is_some() {
            assert!(types.value_for(id).is_some(), "{} has no type", id);
        }
    }
}

#[test]
fn test_control_flow_is_void() {
    let (ast, types) =
        check("fun f(i: integer): integer = ({while i < 3 : {i = i + 1}}, i)").unwrap();

    let while_loop = ast
        .ids()
        .find(|id| matches!(ast.expr(*id), Some(Expr::While { .. })))
        .unwrap();
    assert_eq!(types.value_for(while_loop), Some(&Type::void()));
}

#[test]
fn test_forward_references() {
    let source = "fun f(): integer = g(x); var x: t; typ t: integer; fun g(n: t): integer = n";
    let (ast, types) = check(source).unwrap();

    assert_eq!(types.value_for(definition_named(&ast, "x")), Some(&Type::int()));
}

#[test]
fn test_recursive_function() {
    let source = "fun fact(n: integer): integer = {if n == 0 then 1 else n * fact(n - 1)}";
    // the `if` is void, so the body type does not match the return type
    assert!(matches!(check_error(source), ErrorImpl::ReturnTypeMismatch { .. }));

    let source = "fun fact(n: integer): integer = ({if n == 0 then {r = 1} else {r = n * fact(n - 1)}}, r) { where var r: integer }";
    assert!(check(source).is_ok());
}

#[test]
fn test_cyclic_type_definition() {
    let error = check_error("typ a: b; typ b: a");

    assert!(matches!(error, ErrorImpl::CyclicTypeDefinition { .. }));
}

#[test]
fn test_self_referential_array_type() {
    let error = check_error("typ list: arr[3] list");

    assert!(matches!(error, ErrorImpl::CyclicTypeDefinition { name } if name == "list"));
}

#[test]
fn test_independent_chains_do_not_collide() {
    // `c` is reached twice through separate chains; that is not a cycle
    let (ast, types) = check("typ a: c; typ b: c; typ c: arr[2] integer; var x: a; var y: b").unwrap();

    assert_eq!(
        types.value_for(definition_named(&ast, "y")),
        Some(&Type::array(2, Type::int()))
    );
}

#[test]
fn test_resolution_states() {
    let ast = parse_source("typ a: integer");
    let definitions = check_names(&ast).unwrap();
    let mut checker = TypeChecker::new(&ast, &definitions);
    let a = definition_named(&ast, "a");

    assert_eq!(checker.resolution(a), Resolution::Unvisited);
    assert_eq!(resolve_definition(&mut checker, a).unwrap(), Type::int());
    assert_eq!(checker.resolution(a), Resolution::Done(Type::int()));
    // memoized
    assert_eq!(resolve_definition(&mut checker, a).unwrap(), Type::int());
}

#[test]
fn test_operator_rules() {
    assert!(matches!(
        check_error("fun f(): integer = 1 + true"),
        ErrorImpl::OperandTypeMismatch { operator, .. } if operator == "+"
    ));
    assert!(matches!(
        check_error("fun f(): logical = 1 & true"),
        ErrorImpl::OperandTypeMismatch { operator, .. } if operator == "&"
    ));
    assert!(matches!(
        check_error("fun f(): logical = 1 == true"),
        ErrorImpl::OperandTypeMismatch { .. }
    ));
    assert!(matches!(
        check_error("fun f(): integer = !1"),
        ErrorImpl::OperandTypeMismatch { operator, .. } if operator == "!"
    ));
    assert!(check("fun f(): logical = true == false").is_ok());
    assert!(check("fun f(): logical = 1 < 2 & !false").is_ok());
}

#[test]
fn test_string_comparison_is_rejected() {
    assert!(matches!(
        check_error("fun f(): logical = 'a' == 'a'"),
        ErrorImpl::OperandTypeMismatch { .. }
    ));
}

#[test]
fn test_indexing() {
    let (ast, types) = check("var a: arr[3] arr[2] logical; fun f(): logical = a[1][0]").unwrap();
    let f = definition_named(&ast, "f");
    let Some(Def::Fun(fun)) = ast.def(f) else {
        panic!("expected function");
    };
    assert_eq!(types.value_for(fun.body), Some(&Type::log()));

    assert!(matches!(
        check_error("var a: integer; fun f(): integer = a[0]"),
        ErrorImpl::IndexOnNonArray { received } if received == "integer"
    ));
    assert!(matches!(
        check_error("var a: arr[3] integer; fun f(): integer = a[true]"),
        ErrorImpl::OperandTypeMismatch { .. }
    ));
}

#[test]
fn test_assignment_rules() {
    assert!(check("var s: string; fun f(): string = {s = 'x'}").is_ok());
    assert!(matches!(
        check_error("var x: integer; fun f(): integer = {x = true}"),
        ErrorImpl::AssignmentTypeMismatch { .. }
    ));
    assert!(matches!(
        check_error("var a: arr[2] integer; var b: arr[2] integer; fun f(): integer = ({a = b}, 0)"),
        ErrorImpl::AssignmentTypeMismatch { .. }
    ));
}

#[test]
fn test_call_rules() {
    assert!(matches!(
        check_error("fun g(a: integer): integer = a; fun f(): integer = g(1, 2)"),
        ErrorImpl::ArgumentCountMismatch { expected: 1, received: 2, .. }
    ));
    assert!(matches!(
        check_error("fun g(a: integer, b: logical): integer = a; fun f(): integer = g(1, 2)"),
        ErrorImpl::ArgumentTypeMismatch { index: 1, .. }
    ));
    assert!(check("var a: arr[4] integer; fun g(x: arr[4] integer): integer = x[0]; fun f(): integer = g(a)").is_ok());
}

#[test]
fn test_builtin_signatures() {
    assert!(check("fun f(): string = print_str('hi')").is_ok());
    assert!(check("fun f(): logical = print_log(true)").is_ok());
    assert!(check("fun f(): integer = rand_int(1, 6)").is_ok());
    assert!(check("fun f(): integer = seed(42)").is_ok());
    assert!(matches!(
        check_error("fun f(): integer = print_int('x')"),
        ErrorImpl::ArgumentTypeMismatch { .. }
    ));
    assert!(matches!(
        check_error("fun f(): integer = rand_int(1)"),
        ErrorImpl::ArgumentCountMismatch { .. }
    ));
}

#[test]
fn test_builtin_signature_wins_over_user_definition() {
    let source = "fun print_int(x: string): string = x; fun main(): integer = print_int(1)";
    let (ast, types) = check(source).unwrap();

    let call = ast
        .ids()
        .find(|id| matches!(ast.expr(*id), Some(Expr::Call { .. })))
        .unwrap();
    assert_eq!(types.value_for(call), Some(&Type::int()));

    // The user definition keeps its own signature
    assert_eq!(
        types.value_for(definition_named(&ast, "print_int")),
        Some(&Type::Function {
            parameters: vec![Type::str()],
            return_type: Box::new(Type::str()),
        })
    );

    assert!(matches!(
        check_error("fun print_int(x: string): string = x; fun main(): string = print_int('a')"),
        ErrorImpl::ArgumentTypeMismatch { .. }
    ));
}

#[test]
fn test_conditions_and_loop_bounds() {
    assert!(matches!(
        check_error("fun f(): integer = ({if 1 then 2}, 0)"),
        ErrorImpl::NonBooleanCondition { received } if received == "integer"
    ));
    assert!(matches!(
        check_error("fun f(): integer = ({while 'x' : 1}, 0)"),
        ErrorImpl::NonBooleanCondition { .. }
    ));
    assert!(matches!(
        check_error("fun f(i: integer): integer = ({for i = 0, true, 1 : i}, 0)"),
        ErrorImpl::NonIntegerLoopBound { part, .. } if part == "upper bound"
    ));
    assert!(matches!(
        check_error("fun f(i: logical): integer = ({for i = 0, 1, 1 : 0}, 0)"),
        ErrorImpl::NonIntegerLoopBound { part, .. } if part == "counter"
    ));
}

#[test]
fn test_return_type_mismatch() {
    let error = check("fun f(): integer = true").unwrap_err();

    assert!(matches!(
        error.kind(),
        ErrorImpl::ReturnTypeMismatch { function, expected, received }
            if function == "f" && expected == "integer" && received == "logical"
    ));
    assert_eq!(error.get_position().column, 20);
}

#[test]
fn test_where_body_is_checked() {
    assert!(matches!(
        check_error("fun f(): integer = 1 { where fun g(): integer = false }"),
        ErrorImpl::ReturnTypeMismatch { function, .. } if function == "g"
    ));
}
