//! Integration tests for end-to-end compilation.
//!
//! These tests verify that the complete pipeline works correctly from source
//! code through tokenization, parsing, name resolution, type checking, frame
//! layout and IR lowering.

use pins_compiler::{
    ast::{
        ast::{Ast, NodeId, NodeKind},
        definitions::{Def, DefKind},
        expressions::Expr,
        types::TypeNode,
    },
    compile_source,
    compiler::{
        chunk::Chunk,
        compiler::Compilation,
        ir::{frame_pointer, IrExpr, IrNode, IrOperator, IrStmt},
        stdlib::is_builtin,
    },
    errors::errors::ErrorImpl,
    frames::{access::Access, frame::Label},
    type_checker::types::WORD_SIZE,
};

fn compile(source: &str) -> Compilation {
    compile_source(source, "test.pins").unwrap()
}

fn definition_named(ast: &Ast, name: &str) -> NodeId {
    ast.ids()
        .find(|id| matches!(ast.def(*id), Some(def) if def.name() == name))
        .unwrap()
}

fn code_chunk<'a>(compilation: &'a Compilation, name: &str) -> &'a IrStmt {
    let id = definition_named(&compilation.ast, name);
    let label = &compilation.frames.value_for(id).unwrap().label;

    compilation
        .chunks
        .iter()
        .find_map(|chunk| match chunk {
            Chunk::Code { frame, body } if frame.label == *label => Some(body),
            _ => None,
        })
        .unwrap()
}

/// Memory reads between a variable's frame-relative address and `FP`.
fn indirections(address: &IrExpr) -> Option<u32> {
    let IrExpr::Binop {
        operator: IrOperator::Add,
        left,
        right,
    } = address
    else {
        return None;
    };
    if !matches!(right.as_ref(), IrExpr::Constant(_)) {
        return None;
    }

    let mut base = left.as_ref();
    let mut count = 0;
    while let IrExpr::Memory(inner) = base {
        base = inner.as_ref();
        count += 1;
    }

    (*base == frame_pointer()).then_some(count)
}

/// Static level of the function whose body contains `id`.
fn enclosing_level(compilation: &Compilation, id: NodeId) -> u32 {
    let ast = &compilation.ast;
    let mut level = 0;

    for function in ast.ids() {
        let Some(Def::Fun(fun)) = ast.def(function) else {
            continue;
        };
        if contains(ast, fun.body, id) {
            level = level.max(compilation.frames.value_for(function).unwrap().static_level);
        }
    }

    level
}

fn contains(ast: &Ast, root: NodeId, id: NodeId) -> bool {
    if root == id {
        return true;
    }

    let children = match ast.kind(root) {
        NodeKind::Defs(defs) => defs.clone(),
        NodeKind::Def(def) => def.children(),
        NodeKind::Expr(expr) => expr.children(),
        NodeKind::Type(type_node) => type_node.children(),
    };
    children.into_iter().any(|child| contains(ast, child, id))
}

#[test]
fn test_every_reference_is_bound_to_its_kind() {
    let source = "typ row: arr[4] integer; var g: row; \
                  fun sum(r: row, n: integer): integer = ({for i = 0, n, 1: {s = s + r[i]}}, s) \
                  { where var s: integer; var i: integer }; \
                  fun main(): integer = (seed(1), print_int(sum(g, 4)))";
    let compilation = compile(source);
    let ast = &compilation.ast;

    for id in ast.ids() {
        let expected: &[DefKind] = match ast.kind(id) {
            NodeKind::Expr(Expr::Name { .. }) => &[DefKind::Variable, DefKind::Parameter],
            NodeKind::Expr(Expr::Call { name, .. }) if is_builtin(name) => {
                assert!(compilation.definitions.value_for(id).is_none());
                continue;
            }
            NodeKind::Expr(Expr::Call { .. }) => &[DefKind::Function],
            NodeKind::Type(TypeNode::Name { .. }) => &[DefKind::Type],
            _ => continue,
        };

        let definition = compilation.definitions.value_for(id).unwrap();
        let kind = ast.def(*definition).unwrap().kind();
        assert!(expected.contains(&kind), "{} bound to a {}", id, kind);
    }
}

#[test]
fn test_unresolved_name_stops_compilation() {
    let error = compile_source("fun f(): integer = y", "test.pins").unwrap_err();

    assert!(matches!(
        error.kind(),
        ErrorImpl::UndefinedSymbol { name } if name == "y"
    ));
    assert_eq!(error.get_position().line, 1);
    assert_eq!(error.get_position().column, 20);
}

#[test]
fn test_wrong_kind_reference_stops_compilation() {
    let error = compile_source("fun f(): integer = f + 1", "test.pins").unwrap_err();

    assert!(matches!(
        error.kind(),
        ErrorImpl::WrongKindReference { name, .. } if name == "f"
    ));
}

#[test]
fn test_nested_static_levels() {
    let source = "fun a(): integer = 0 { where \
                    fun b(): integer = 0 { where fun c(): integer = 0 }; \
                    fun d(): integer = 0 }; \
                  fun e(): integer = 0";
    let compilation = compile(source);
    let ast = &compilation.ast;

    let level = |name: &str| {
        compilation
            .frames
            .value_for(definition_named(ast, name))
            .unwrap()
            .static_level
    };

    assert_eq!(level("a"), 1);
    assert_eq!(level("e"), 1);
    assert_eq!(level("b"), level("a") + 1);
    assert_eq!(level("d"), level("a") + 1);
    assert_eq!(level("c"), level("b") + 1);
}

#[test]
fn test_indirections_match_static_distance() {
    let source = "fun f(p: integer): integer = (p, x) { where var x: integer; \
                    fun g(q: integer): integer = (p, q, x, y) { where var y: integer; \
                      fun h(): integer = (p, q, x, y) } }";
    let compilation = compile(source);
    let ast = &compilation.ast;

    let mut checked = 0;
    for id in ast.ids() {
        let Some(Expr::Name { .. }) = ast.expr(id) else {
            continue;
        };

        let definition = *compilation.definitions.value_for(id).unwrap();
        let target_level = match compilation.accesses.value_for(definition).unwrap() {
            Access::Local { static_level, .. } | Access::Parameter { static_level, .. } => {
                *static_level
            }
            Access::Global { .. } => continue,
        };

        let Some(IrNode::Expr(IrExpr::Memory(address))) = compilation.ir.value_for(id) else {
            panic!("{} is not a memory read", id);
        };

        let caller_level = enclosing_level(&compilation, id);
        assert_eq!(
            indirections(address),
            Some(caller_level.abs_diff(target_level)),
            "{} read from level {}",
            ast.describe(id),
            caller_level
        );
        checked += 1;
    }

    assert_eq!(checked, 2 + 4 + 4);
}

#[test]
fn test_parameter_layout() {
    let source = "typ m: arr[2] arr[2] logical; \
                  fun f(a: integer, b: m, c: string): integer = a { where \
                    fun g(d: logical, e: integer, k: m): integer = e }";
    let compilation = compile(source);
    let ast = &compilation.ast;

    for name in ["f", "g"] {
        let id = definition_named(ast, name);
        let Some(Def::Fun(fun)) = ast.def(id) else {
            panic!("{} is not a function", name);
        };

        let mut sizes = 0;
        let mut next_offset = WORD_SIZE as i32;
        for parameter in &fun.parameters {
            let Some(Access::Parameter { size, offset, .. }) =
                compilation.accesses.value_for(*parameter)
            else {
                panic!("parameter without a parameter access");
            };

            assert_eq!(*offset, next_offset);
            next_offset += *size as i32;
            sizes += size;
        }

        let frame = compilation.frames.value_for(id).unwrap();
        assert_eq!(sizes + WORD_SIZE, frame.parameters_size);
    }
}

#[test]
fn test_cyclic_type_alias() {
    let error = compile_source("typ a: b; typ b: a", "test.pins").unwrap_err();

    assert!(matches!(
        error.kind(),
        ErrorImpl::CyclicTypeDefinition { name } if name == "a" || name == "b"
    ));
    assert_eq!(error.get_error_name(), "CyclicTypeDefinition");
}

#[test]
fn test_oversized_storage_is_an_error() {
    let sources = [
        "var a: arr[2000000000] integer",
        "fun f(): integer = 0 { where var a: arr[600000000] arr[2] integer }",
        "fun f(): integer = 0 { where var a: arr[300000000] integer; var b: arr[300000000] integer }",
    ];

    for source in sources {
        let error = compile_source(source, "test.pins").unwrap_err();
        assert!(
            matches!(
                error.kind(),
                ErrorImpl::TypeTooLarge { .. } | ErrorImpl::FrameTooLarge { .. }
            ),
            "{}: {}",
            source,
            error
        );
    }
}

#[test]
fn test_add_scenario() {
    let compilation = compile("fun add(a: integer, b: integer): integer = a + b");
    let add = definition_named(&compilation.ast, "add");

    let frame = compilation.frames.value_for(add).unwrap();
    assert_eq!(frame.label, Label::named("add"));
    assert_eq!(frame.static_level, 1);
    assert_eq!(frame.parameters_size, 12);

    for (name, offset) in [("a", 4), ("b", 8)] {
        assert_eq!(
            compilation
                .accesses
                .value_for(definition_named(&compilation.ast, name)),
            Some(&Access::Parameter {
                size: 4,
                offset,
                static_level: 1
            })
        );
    }

    let parameter = |offset| {
        IrExpr::memory(IrExpr::binop(
            IrOperator::Add,
            frame_pointer(),
            IrExpr::Constant(offset),
        ))
    };
    assert_eq!(compilation.chunks.len(), 1);
    assert_eq!(
        *code_chunk(&compilation, "add"),
        IrStmt::Move {
            destination: IrExpr::memory(frame_pointer()),
            source: IrExpr::binop(IrOperator::Add, parameter(4), parameter(8)),
        }
    );
}

#[test]
fn test_nested_function_scenario() {
    let source = "fun outer(): integer = {x = 5} { where \
                    typ t: integer; var x: t; fun inner(): integer = x }";
    let compilation = compile(source);
    let ast = &compilation.ast;

    let inner = compilation
        .frames
        .value_for(definition_named(ast, "inner"))
        .unwrap();
    assert_eq!(inner.static_level, 2);
    assert!(matches!(inner.label, Label::Anonymous(_)));

    let x = IrExpr::memory(IrExpr::binop(
        IrOperator::Add,
        IrExpr::memory(frame_pointer()),
        IrExpr::Constant(-8),
    ));
    assert_eq!(
        *code_chunk(&compilation, "inner"),
        IrStmt::Move {
            destination: IrExpr::memory(frame_pointer()),
            source: x,
        }
    );
}

#[test]
fn test_for_loop_scenario() {
    let source = "fun main(): integer = ({for i = 0, 10, 1: print_int(i)}, 0) { where var i: integer }";
    let compilation = compile(source);
    let ast = &compilation.ast;

    let id = ast
        .ids()
        .find(|id| matches!(ast.expr(*id), Some(Expr::For { .. })))
        .unwrap();
    let Some(IrNode::Expr(IrExpr::Eseq {
        statement,
        expression,
    })) = compilation.ir.value_for(id)
    else {
        panic!("expected a sequence");
    };
    assert_eq!(**expression, IrExpr::Constant(0));

    let IrStmt::Sequence(statements) = statement.as_ref() else {
        panic!("expected a statement sequence");
    };

    let i = IrExpr::memory(IrExpr::binop(
        IrOperator::Add,
        frame_pointer(),
        IrExpr::Constant(-4),
    ));
    let (start, body, end) = (Label::Anonymous(0), Label::Anonymous(1), Label::Anonymous(2));

    assert_eq!(
        *statements,
        vec![
            IrStmt::Move {
                destination: i.clone(),
                source: IrExpr::Constant(0),
            },
            IrStmt::Label(start.clone()),
            IrStmt::CJump {
                condition: IrExpr::binop(IrOperator::Lt, i.clone(), IrExpr::Constant(10)),
                true_label: body.clone(),
                false_label: end.clone(),
            },
            IrStmt::Label(body),
            IrStmt::Expr(IrExpr::Call {
                label: Label::named("print_int"),
                arguments: vec![IrExpr::Constant(0), i.clone()],
            }),
            IrStmt::Move {
                destination: i.clone(),
                source: IrExpr::binop(IrOperator::Add, i, IrExpr::Constant(1)),
            },
            IrStmt::Jump(start),
            IrStmt::Label(end),
        ]
    );

    // print_int takes no static link
    let frame = compilation
        .frames
        .value_for(definition_named(ast, "main"))
        .unwrap();
    assert_eq!(frame.outgoing_args_size, WORD_SIZE);
}

#[test]
fn test_string_literals_are_not_shared() {
    let compilation = compile("fun f(): string = (print_str('hi'), 'hi')");

    let data: Vec<(&Access, &String)> = compilation
        .chunks
        .iter()
        .filter_map(|chunk| match chunk {
            Chunk::Data { access, value } => Some((access, value)),
            _ => None,
        })
        .collect();

    assert_eq!(data.len(), 2);
    assert_eq!(data[0].1, "hi");
    assert_eq!(data[1].1, "hi");

    let Access::Global { label: first, .. } = data[0].0 else {
        panic!("expected a global access");
    };
    let Access::Global { label: second, .. } = data[1].0 else {
        panic!("expected a global access");
    };
    assert_ne!(first, second);
}

#[test]
fn test_generated_labels_are_unique() {
    let source = "fun f(x: logical): integer = ({if x then g() else g()}, {while x: {x = false}}, 0) \
                  { where fun g(): integer = (print_str('a'), 0); fun h(): string = 'b' }";
    let compilation = compile(source);

    let mut labels: Vec<Label> = compilation
        .frames
        .entries()
        .into_iter()
        .map(|(_, frame)| frame.label.clone())
        .collect();

    for chunk in &compilation.chunks {
        match chunk {
            Chunk::Data {
                access: Access::Global { label, .. },
                ..
            } => labels.push(label.clone()),
            Chunk::Code { body, .. } => collect_labels(body, &mut labels),
            _ => {}
        }
    }

    let count = labels.len();
    labels.sort_by_key(|label| label.to_string());
    labels.dedup();
    assert_eq!(labels.len(), count);
}

/// Labels defined by `LABEL` statements.
fn collect_labels(statement: &IrStmt, labels: &mut Vec<Label>) {
    match statement {
        IrStmt::Label(label) => labels.push(label.clone()),
        IrStmt::Sequence(statements) => {
            for statement in statements {
                collect_labels(statement, labels);
            }
        }
        IrStmt::Move {
            destination,
            source,
        } => {
            collect_expr_labels(destination, labels);
            collect_expr_labels(source, labels);
        }
        IrStmt::Expr(expression) => collect_expr_labels(expression, labels),
        IrStmt::CJump { condition, .. } => collect_expr_labels(condition, labels),
        IrStmt::Jump(_) => {}
    }
}

fn collect_expr_labels(expression: &IrExpr, labels: &mut Vec<Label>) {
    match expression {
        IrExpr::Eseq {
            statement,
            expression,
        } => {
            collect_labels(statement, labels);
            collect_expr_labels(expression, labels);
        }
        IrExpr::Memory(address) => collect_expr_labels(address, labels),
        IrExpr::Binop { left, right, .. } => {
            collect_expr_labels(left, labels);
            collect_expr_labels(right, labels);
        }
        IrExpr::Call { arguments, .. } => {
            for argument in arguments {
                collect_expr_labels(argument, labels);
            }
        }
        IrExpr::Constant(_) | IrExpr::Name(_) => {}
    }
}

#[test]
fn test_type_errors_are_reported() {
    let cases = [
        ("fun f(): integer = 1 + true", "OperandTypeMismatch"),
        ("fun f(): integer = print_int(1, 2)", "ArgumentCountMismatch"),
        ("fun f(): integer = print_int('a')", "ArgumentTypeMismatch"),
        ("fun f(): integer = ({if 1 then 2}, 0)", "NonBooleanCondition"),
        ("fun f(): logical = true; fun g(): integer = f()[0]", "IndexOnNonArray"),
        ("fun f(): integer = 'a'", "ReturnTypeMismatch"),
    ];

    for (source, expected) in cases {
        let error = compile_source(source, "test.pins").unwrap_err();
        assert_eq!(error.get_error_name(), expected, "{}", source);
    }
}

#[test]
fn test_syntax_errors_are_reported() {
    let error = compile_source("fun f(): integer = 'open", "test.pins").unwrap_err();
    assert_eq!(error.get_error_name(), "UnterminatedString");

    let error = compile_source("fun f(: integer = 1", "test.pins").unwrap_err();
    assert_eq!(error.get_position().column, 7);
}
