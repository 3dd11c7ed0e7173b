use crate::{
    ast::{
        ast::NodeId,
        expressions::{AtomKind, BinaryOperator, Expr, UnaryOperator},
    },
    errors::errors::{Error, ErrorImpl},
    frames::{access::Access, frame::Label},
    type_checker::types::WORD_SIZE,
};

use super::{
    chunk::Chunk,
    compiler::Compiler,
    ir::{frame_pointer, stack_pointer, IrExpr, IrNode, IrOperator, IrStmt},
    stdlib::is_builtin,
    stmt::{gen_definitions, gen_for, gen_if, gen_while},
};

/// Lowers the expression `id` and records its IR.
pub fn gen_expression(compiler: &mut Compiler, id: NodeId) -> Result<IrExpr, Error> {
    let ast = compiler.ast;
    let Some(expr) = ast.expr(id) else {
        return Err(compiler.internal_error(id, format!("{} is not an expression", id)));
    };

    let ir = match expr {
        Expr::Literal { value, kind } => gen_literal(compiler, id, value, *kind)?,
        Expr::Name { .. } => gen_name(compiler, id)?,
        Expr::Call { name, arguments } => gen_call(compiler, id, name, arguments)?,
        Expr::Binary {
            left,
            operator,
            right,
        } => gen_binary(compiler, id, *left, *operator, *right)?,
        Expr::Unary {
            operator,
            expression,
        } => {
            let operand = gen_expression(compiler, *expression)?;
            // Logical values are 0 and 1
            let (left, operator) = match operator {
                UnaryOperator::Plus => (0, IrOperator::Add),
                UnaryOperator::Minus => (0, IrOperator::Sub),
                UnaryOperator::Not => (1, IrOperator::Sub),
            };
            IrExpr::binop(operator, IrExpr::Constant(left), operand)
        }
        Expr::Block { expressions } => {
            let Some((last, rest)) = expressions.split_last() else {
                return Err(compiler.internal_error(id, String::from("empty block")));
            };

            let mut statements = vec![];
            for expression in rest {
                statements.push(IrStmt::Expr(gen_expression(compiler, *expression)?));
            }
            let value = gen_expression(compiler, *last)?;

            IrExpr::eseq(IrStmt::Sequence(statements), value)
        }
        Expr::IfThenElse {
            condition,
            then_expression,
            else_expression,
        } => gen_if(compiler, *condition, *then_expression, *else_expression)?,
        Expr::While { condition, body } => gen_while(compiler, *condition, *body)?,
        Expr::For {
            counter,
            low,
            high,
            step,
            body,
        } => gen_for(compiler, *counter, *low, *high, *step, *body)?,
        Expr::Where { defs, expression } => {
            gen_definitions(compiler, *defs)?;
            gen_expression(compiler, *expression)?
        }
    };

    compiler.store(id, IrNode::Expr(ir.clone()))?;
    Ok(ir)
}

/// The frame pointer followed through `depth` static links.
pub fn static_link(depth: u32) -> IrExpr {
    (0..depth).fold(frame_pointer(), |address, _| IrExpr::memory(address))
}

fn gen_literal(
    compiler: &mut Compiler,
    id: NodeId,
    value: &str,
    kind: AtomKind,
) -> Result<IrExpr, Error> {
    match kind {
        AtomKind::Integer => value
            .parse::<i32>()
            .map(IrExpr::Constant)
            .map_err(|_| compiler.internal_error(id, format!("invalid integer {}", value))),
        AtomKind::Logical => Ok(IrExpr::Constant(i32::from(value == "true"))),
        AtomKind::String => {
            let label = compiler.next_label();
            compiler.emit(Chunk::Data {
                access: Access::Global {
                    size: WORD_SIZE,
                    label: label.clone(),
                },
                value: String::from(value),
            });
            Ok(IrExpr::Name(label))
        }
    }
}

/// Value of a variable or parameter. Arrays evaluate to their address.
fn gen_name(compiler: &mut Compiler, id: NodeId) -> Result<IrExpr, Error> {
    let Some(definition) = compiler.definition_of(id) else {
        return Err(compiler.internal_error(id, format!("{} names nothing", id)));
    };

    let is_array = compiler.type_of(definition)?.is_array();

    let ir = match compiler.access_of(definition)? {
        Access::Global { label, .. } => {
            let address = IrExpr::Name(label.clone());
            if is_array {
                address
            } else {
                IrExpr::memory(address)
            }
        }
        Access::Local {
            offset,
            static_level,
            ..
        } => {
            let address = frame_address(compiler, *static_level, *offset);
            if is_array {
                address
            } else {
                IrExpr::memory(address)
            }
        }
        // Array parameters hold the address of the array
        Access::Parameter {
            offset,
            static_level,
            ..
        } => IrExpr::memory(frame_address(compiler, *static_level, *offset)),
    };

    Ok(ir)
}

/// Address `offset` bytes from the frame pointer of the function at
/// `static_level`.
fn frame_address(compiler: &Compiler, static_level: u32, offset: i32) -> IrExpr {
    let base = static_link(compiler.static_level.abs_diff(static_level));
    IrExpr::binop(IrOperator::Add, base, IrExpr::Constant(offset))
}

fn gen_call(
    compiler: &mut Compiler,
    id: NodeId,
    name: &str,
    arguments: &[NodeId],
) -> Result<IrExpr, Error> {
    let mut lowered = vec![];
    for argument in arguments {
        lowered.push(gen_expression(compiler, *argument)?);
    }

    if is_builtin(name) {
        // Built-ins take no static link
        lowered.insert(0, IrExpr::Constant(0));
        return Ok(IrExpr::Call {
            label: Label::named(name),
            arguments: lowered,
        });
    }

    let Some(function) = compiler.definition_of(id) else {
        return Err(compiler.internal_error(id, format!("call to {} is unbound", name)));
    };

    let callee = compiler.frame_of(function)?;
    let caller_level = compiler.static_level;

    let link = if callee.static_level == 1 {
        IrExpr::Constant(0)
    } else if callee.static_level == caller_level + 1 {
        frame_pointer()
    } else {
        // Walk up to the callee's lexical parent
        static_link((caller_level + 1).saturating_sub(callee.static_level))
    };
    lowered.insert(0, link);

    let save_frame_pointer = IrStmt::Move {
        destination: IrExpr::memory(IrExpr::binop(
            IrOperator::Sub,
            stack_pointer(),
            IrExpr::Constant(callee.old_frame_pointer_offset()),
        )),
        source: frame_pointer(),
    };

    Ok(IrExpr::eseq(
        save_frame_pointer,
        IrExpr::Call {
            label: callee.label.clone(),
            arguments: lowered,
        },
    ))
}

fn gen_binary(
    compiler: &mut Compiler,
    id: NodeId,
    left: NodeId,
    operator: BinaryOperator,
    right: NodeId,
) -> Result<IrExpr, Error> {
    let left_ir = gen_expression(compiler, left)?;
    let right_ir = gen_expression(compiler, right)?;

    match operator {
        BinaryOperator::Assign => Ok(IrExpr::eseq(
            IrStmt::Move {
                destination: left_ir.clone(),
                source: right_ir,
            },
            left_ir,
        )),
        BinaryOperator::Index => {
            let Some(element) = compiler.type_of(left)?.element() else {
                return Err(compiler.internal_error(id, format!("{} indexes a non-array", id)));
            };

            let element_size = element.size_in_bytes().and_then(|size| i32::try_from(size).ok());
            let Some(element_size) = element_size else {
                return Err(compiler.error_at(
                    left,
                    ErrorImpl::TypeTooLarge {
                        ty: element.to_string(),
                    },
                ));
            };

            let offset = IrExpr::binop(IrOperator::Mul, right_ir, IrExpr::Constant(element_size));
            let address = IrExpr::binop(IrOperator::Add, left_ir, offset);

            if element.is_array() {
                Ok(address)
            } else {
                Ok(IrExpr::memory(address))
            }
        }
        _ => {
            let Some(operator) = IrOperator::from_binary(operator) else {
                return Err(compiler.internal_error(id, format!("no IR operator for {}", operator)));
            };
            Ok(IrExpr::binop(operator, left_ir, right_ir))
        }
    }
}
