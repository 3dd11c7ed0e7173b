use tracing::trace;

use crate::{
    ast::{
        ast::{NodeId, NodeKind},
        definitions::{Def, FunDef},
    },
    errors::errors::Error,
    frames::access::Access,
};

use super::{
    chunk::Chunk,
    compiler::Compiler,
    expr::gen_expression,
    ir::{frame_pointer, IrExpr, IrNode, IrOperator, IrStmt},
};

/// Lowers every definition of a `Defs` node.
pub fn gen_definitions(compiler: &mut Compiler, id: NodeId) -> Result<(), Error> {
    let ast = compiler.ast;

    match ast.kind(id) {
        NodeKind::Defs(defs) => {
            for def in defs {
                gen_definition(compiler, *def)?;
            }
            Ok(())
        }
        _ => Err(compiler.internal_error(id, format!("{} is not a definition list", id))),
    }
}

pub fn gen_definition(compiler: &mut Compiler, id: NodeId) -> Result<(), Error> {
    let ast = compiler.ast;

    match ast.def(id) {
        Some(Def::Fun(fun)) => gen_function(compiler, id, fun),
        Some(Def::Var(_)) => {
            let access = compiler.access_of(id)?;
            if let Access::Global { .. } = access {
                compiler.emit(Chunk::Global {
                    access: access.clone(),
                });
            }
            Ok(())
        }
        // Types and parameters have storage but no code
        Some(Def::Type(_)) | Some(Def::Parameter(_)) => Ok(()),
        None => Err(compiler.internal_error(id, format!("{} is not a definition", id))),
    }
}

/// Emits the code chunk of a function: its body's value moved to `MEM(FP)`.
fn gen_function(compiler: &mut Compiler, id: NodeId, fun: &FunDef) -> Result<(), Error> {
    let frame = compiler.frame_of(id)?;

    let enclosing_level = compiler.static_level;
    compiler.static_level = frame.static_level;
    let body = gen_expression(compiler, fun.body);
    compiler.static_level = enclosing_level;

    let body = IrStmt::Move {
        destination: IrExpr::memory(frame_pointer()),
        source: body?,
    };

    trace!(function = fun.name.as_str(), label = %frame.label, "lowered function");
    compiler.store(id, IrNode::Stmt(body.clone()))?;
    compiler.emit(Chunk::Code {
        frame: frame.clone(),
        body,
    });
    Ok(())
}

/// Evaluates `statements` and yields `0`, the value of void expressions.
fn void_sequence(statements: Vec<IrStmt>) -> IrExpr {
    IrExpr::eseq(IrStmt::Sequence(statements), IrExpr::Constant(0))
}

/// ```text
/// CJUMP cond then else
/// then: EXP then_expression; JUMP end
/// else: EXP else_expression
/// end:
/// ```
///
/// Without an `else` the false branch jumps straight to `end`.
pub fn gen_if(
    compiler: &mut Compiler,
    condition: NodeId,
    then_expression: NodeId,
    else_expression: Option<NodeId>,
) -> Result<IrExpr, Error> {
    let condition = gen_expression(compiler, condition)?;
    let then_branch = gen_expression(compiler, then_expression)?;

    let then_label = compiler.next_label();
    let end_label = compiler.next_label();

    let mut statements = vec![];

    match else_expression {
        Some(else_expression) => {
            let else_branch = gen_expression(compiler, else_expression)?;
            let else_label = compiler.next_label();

            statements.push(IrStmt::CJump {
                condition,
                true_label: then_label.clone(),
                false_label: else_label.clone(),
            });
            statements.push(IrStmt::Label(then_label));
            statements.push(IrStmt::Expr(then_branch));
            statements.push(IrStmt::Jump(end_label.clone()));
            statements.push(IrStmt::Label(else_label));
            statements.push(IrStmt::Expr(else_branch));
        }
        None => {
            statements.push(IrStmt::CJump {
                condition,
                true_label: then_label.clone(),
                false_label: end_label.clone(),
            });
            statements.push(IrStmt::Label(then_label));
            statements.push(IrStmt::Expr(then_branch));
        }
    }

    statements.push(IrStmt::Label(end_label));
    Ok(void_sequence(statements))
}

/// ```text
/// start: CJUMP cond body end
/// body:  EXP body; JUMP start
/// end:
/// ```
pub fn gen_while(compiler: &mut Compiler, condition: NodeId, body: NodeId) -> Result<IrExpr, Error> {
    let condition = gen_expression(compiler, condition)?;
    let body = gen_expression(compiler, body)?;

    let start_label = compiler.next_label();
    let body_label = compiler.next_label();
    let end_label = compiler.next_label();

    Ok(void_sequence(vec![
        IrStmt::Label(start_label.clone()),
        IrStmt::CJump {
            condition,
            true_label: body_label.clone(),
            false_label: end_label.clone(),
        },
        IrStmt::Label(body_label),
        IrStmt::Expr(body),
        IrStmt::Jump(start_label),
        IrStmt::Label(end_label),
    ]))
}

/// ```text
///        MOVE counter low
/// start: CJUMP (counter < high) body end
/// body:  EXP body; MOVE counter (counter + step); JUMP start
/// end:
/// ```
///
/// Nothing checks that `step` moves the counter towards `high`.
pub fn gen_for(
    compiler: &mut Compiler,
    counter: NodeId,
    low: NodeId,
    high: NodeId,
    step: NodeId,
    body: NodeId,
) -> Result<IrExpr, Error> {
    let counter = gen_expression(compiler, counter)?;
    let low = gen_expression(compiler, low)?;
    let high = gen_expression(compiler, high)?;
    let step = gen_expression(compiler, step)?;
    let body = gen_expression(compiler, body)?;

    let start_label = compiler.next_label();
    let body_label = compiler.next_label();
    let end_label = compiler.next_label();

    Ok(void_sequence(vec![
        IrStmt::Move {
            destination: counter.clone(),
            source: low,
        },
        IrStmt::Label(start_label.clone()),
        IrStmt::CJump {
            condition: IrExpr::binop(IrOperator::Lt, counter.clone(), high),
            true_label: body_label.clone(),
            false_label: end_label.clone(),
        },
        IrStmt::Label(body_label),
        IrStmt::Expr(body),
        IrStmt::Move {
            destination: counter.clone(),
            source: IrExpr::binop(IrOperator::Add, counter, step),
        },
        IrStmt::Jump(start_label),
        IrStmt::Label(end_label),
    ]))
}
