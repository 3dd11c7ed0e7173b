use std::collections::HashMap;

use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{Ast, NodeId, NodeKind},
        definitions::Def,
        expressions::{BinaryOperator, Expr, UnaryOperator},
        types::TypeNode,
    },
    compiler::stdlib::builtin_signature,
    errors::errors::{Error, ErrorImpl},
    side_table::SideTable,
};

use super::types::Type;

/// Resolution state of a definition's type.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Unvisited,
    /// Being resolved further up the current chain; meeting it again is a cycle
    InProgress,
    Done(Type),
}

#[derive(Debug)]
pub struct TypeChecker<'a> {
    pub ast: &'a Ast,
    pub definitions: &'a SideTable<NodeId>,
    pub types: SideTable<Type>,
    pub resolutions: HashMap<NodeId, Resolution>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(ast: &'a Ast, definitions: &'a SideTable<NodeId>) -> Self {
        TypeChecker {
            ast,
            definitions,
            types: SideTable::new(),
            resolutions: HashMap::new(),
        }
    }

    pub fn resolution(&self, definition: NodeId) -> Resolution {
        self.resolutions
            .get(&definition)
            .cloned()
            .unwrap_or(Resolution::Unvisited)
    }

    pub fn error_at(&self, id: NodeId, error: ErrorImpl) -> Error {
        Error::new(error, self.ast.span(id).start.clone())
    }

    fn internal_error(&self, id: NodeId, message: String) -> Error {
        self.error_at(id, ErrorImpl::InternalError { message })
    }

    /// Records the type of `id` and hands it back.
    fn store(&mut self, id: NodeId, ty: Type) -> Result<Type, Error> {
        self.types
            .store(id, ty.clone())
            .map_err(|_| self.internal_error(id, format!("type of {} computed twice", id)))?;
        Ok(ty)
    }

    fn definition_of(&self, reference: NodeId) -> Option<NodeId> {
        self.definitions.value_for(reference).copied()
    }
}

/// Type of the definition `id`, resolving it now if nothing has asked for
/// it yet. Functions resolve to their signature only; bodies are checked by
/// [`type_check_node`].
pub fn resolve_definition(checker: &mut TypeChecker, id: NodeId) -> Result<Type, Error> {
    let ast = checker.ast;
    let Some(def) = ast.def(id) else {
        return Err(checker.internal_error(id, format!("{} is not a definition", id)));
    };

    match checker.resolution(id) {
        Resolution::Done(ty) => return Ok(ty),
        Resolution::InProgress => {
            return Err(match def {
                Def::Type(type_def) => checker.error_at(
                    id,
                    ErrorImpl::CyclicTypeDefinition {
                        name: type_def.name.clone(),
                    },
                ),
                _ => checker.internal_error(id, format!("{} depends on itself", def.name())),
            });
        }
        Resolution::Unvisited => {}
    }

    checker.resolutions.insert(id, Resolution::InProgress);

    let ty = match def {
        Def::Fun(fun) => {
            let mut parameters = vec![];
            for parameter in &fun.parameters {
                parameters.push(resolve_definition(checker, *parameter)?);
            }

            Type::Function {
                parameters,
                return_type: Box::new(type_check_type(checker, fun.return_type)?),
            }
        }
        Def::Var(var) => type_check_type(checker, var.ty)?,
        Def::Type(type_def) => type_check_type(checker, type_def.ty)?,
        Def::Parameter(parameter) => type_check_type(checker, parameter.ty)?,
    };

    trace!(name = def.name(), ty = %ty, "resolved definition");
    checker.resolutions.insert(id, Resolution::Done(ty.clone()));
    checker.store(id, ty)
}

/// Semantic type of a type node.
pub fn type_check_type(checker: &mut TypeChecker, id: NodeId) -> Result<Type, Error> {
    if let Some(ty) = checker.types.value_for(id) {
        return Ok(ty.clone());
    }

    let ast = checker.ast;
    let Some(type_node) = ast.type_node(id) else {
        return Err(checker.internal_error(id, format!("{} is not a type", id)));
    };

    let ty = match type_node {
        TypeNode::Atom(kind) => Type::from(*kind),
        TypeNode::Array { size, element } => {
            let ty = Type::array(*size, type_check_type(checker, *element)?);
            if ty.size_in_bytes().is_none() {
                return Err(checker.error_at(id, ErrorImpl::TypeTooLarge { ty: ty.to_string() }));
            }
            ty
        }
        TypeNode::Name { name } => {
            let Some(definition) = checker.definition_of(id) else {
                return Err(checker.error_at(id, ErrorImpl::UndefinedType { name: name.clone() }));
            };
            resolve_definition(checker, definition)?
        }
    };

    checker.store(id, ty)
}

fn operand_mismatch(
    checker: &TypeChecker,
    id: NodeId,
    operator: impl ToString,
    operands: &[&Type],
) -> Error {
    let received: Vec<String> = operands.iter().map(|ty| ty.to_string()).collect();
    checker.error_at(
        id,
        ErrorImpl::OperandTypeMismatch {
            operator: operator.to_string(),
            received: received.join(", "),
        },
    )
}

fn expect_condition(checker: &mut TypeChecker, condition: NodeId) -> Result<(), Error> {
    let ty = type_check_expr(checker, condition)?;
    if !ty.is_log() {
        return Err(checker.error_at(
            condition,
            ErrorImpl::NonBooleanCondition {
                received: ty.to_string(),
            },
        ));
    }
    Ok(())
}

fn type_check_call(
    checker: &mut TypeChecker,
    id: NodeId,
    name: &str,
    arguments: &[NodeId],
) -> Result<Type, Error> {
    let signature = match (builtin_signature(name), checker.definition_of(id)) {
        (Some(signature), _) => signature,
        (None, Some(definition)) => resolve_definition(checker, definition)?,
        (None, None) => {
            return Err(checker.error_at(
                id,
                ErrorImpl::UndefinedSymbol {
                    name: String::from(name),
                },
            ))
        }
    };

    let Type::Function {
        parameters,
        return_type,
    } = signature
    else {
        return Err(checker.internal_error(id, format!("{} is not callable", name)));
    };

    if parameters.len() != arguments.len() {
        return Err(checker.error_at(
            id,
            ErrorImpl::ArgumentCountMismatch {
                function: String::from(name),
                expected: parameters.len(),
                received: arguments.len(),
            },
        ));
    }

    for (index, (argument, parameter)) in arguments.iter().zip(parameters.iter()).enumerate() {
        let argument_type = type_check_expr(checker, *argument)?;
        if argument_type != *parameter {
            return Err(checker.error_at(
                *argument,
                ErrorImpl::ArgumentTypeMismatch {
                    function: String::from(name),
                    index,
                    expected: parameter.to_string(),
                    received: argument_type.to_string(),
                },
            ));
        }
    }

    Ok(*return_type)
}

fn type_check_binary(
    checker: &mut TypeChecker,
    id: NodeId,
    left: NodeId,
    operator: BinaryOperator,
    right: NodeId,
) -> Result<Type, Error> {
    let left_type = type_check_expr(checker, left)?;
    let right_type = type_check_expr(checker, right)?;

    match operator {
        BinaryOperator::Or | BinaryOperator::And => {
            if left_type.is_log() && right_type.is_log() {
                Ok(Type::log())
            } else {
                Err(operand_mismatch(checker, id, operator, &[&left_type, &right_type]))
            }
        }
        BinaryOperator::Add
        | BinaryOperator::Sub
        | BinaryOperator::Mul
        | BinaryOperator::Div
        | BinaryOperator::Mod => {
            if left_type.is_int() && right_type.is_int() {
                Ok(Type::int())
            } else {
                Err(operand_mismatch(checker, id, operator, &[&left_type, &right_type]))
            }
        }
        BinaryOperator::Eq
        | BinaryOperator::Neq
        | BinaryOperator::Lt
        | BinaryOperator::Gt
        | BinaryOperator::Leq
        | BinaryOperator::Geq => {
            let both_int = left_type.is_int() && right_type.is_int();
            let both_log = left_type.is_log() && right_type.is_log();
            if both_int || both_log {
                Ok(Type::log())
            } else {
                Err(operand_mismatch(checker, id, operator, &[&left_type, &right_type]))
            }
        }
        BinaryOperator::Index => {
            let Some(element) = left_type.element() else {
                return Err(checker.error_at(
                    left,
                    ErrorImpl::IndexOnNonArray {
                        received: left_type.to_string(),
                    },
                ));
            };
            if !right_type.is_int() {
                return Err(operand_mismatch(checker, right, operator, &[&right_type]));
            }
            Ok(element.clone())
        }
        BinaryOperator::Assign => {
            if left_type == right_type && left_type.is_assignable() {
                Ok(left_type)
            } else {
                Err(checker.error_at(
                    id,
                    ErrorImpl::AssignmentTypeMismatch {
                        left: left_type.to_string(),
                        right: right_type.to_string(),
                    },
                ))
            }
        }
    }
}

/// Type of the expression `id`, memoized.
pub fn type_check_expr(checker: &mut TypeChecker, id: NodeId) -> Result<Type, Error> {
    if let Some(ty) = checker.types.value_for(id) {
        return Ok(ty.clone());
    }

    let ast = checker.ast;
    let Some(expr) = ast.expr(id) else {
        return Err(checker.internal_error(id, format!("{} is not an expression", id)));
    };

    let ty = match expr {
        Expr::Literal { kind, .. } => Type::from(*kind),
        Expr::Name { name } => {
            let Some(definition) = checker.definition_of(id) else {
                return Err(checker.error_at(id, ErrorImpl::UndefinedSymbol { name: name.clone() }));
            };
            resolve_definition(checker, definition)?
        }
        Expr::Call { name, arguments } => type_check_call(checker, id, name, arguments)?,
        Expr::Binary {
            left,
            operator,
            right,
        } => type_check_binary(checker, id, *left, *operator, *right)?,
        Expr::Unary {
            operator,
            expression,
        } => {
            let operand = type_check_expr(checker, *expression)?;
            let valid = match operator {
                UnaryOperator::Plus | UnaryOperator::Minus => operand.is_int(),
                UnaryOperator::Not => operand.is_log(),
            };
            if !valid {
                return Err(operand_mismatch(checker, id, operator, &[&operand]));
            }
            operand
        }
        Expr::Block { expressions } => {
            let mut last = None;
            for expression in expressions {
                last = Some(type_check_expr(checker, *expression)?);
            }
            last.ok_or_else(|| checker.internal_error(id, String::from("empty block")))?
        }
        Expr::IfThenElse {
            condition,
            then_expression,
            else_expression,
        } => {
            expect_condition(checker, *condition)?;
            type_check_expr(checker, *then_expression)?;
            if let Some(else_expression) = else_expression {
                type_check_expr(checker, *else_expression)?;
            }
            Type::void()
        }
        Expr::While { condition, body } => {
            expect_condition(checker, *condition)?;
            type_check_expr(checker, *body)?;
            Type::void()
        }
        Expr::For {
            counter,
            low,
            high,
            step,
            body,
        } => {
            let parts = [
                (*counter, "counter"),
                (*low, "lower bound"),
                (*high, "upper bound"),
                (*step, "step"),
            ];
            for (part, description) in parts {
                let ty = type_check_expr(checker, part)?;
                if !ty.is_int() {
                    return Err(checker.error_at(
                        part,
                        ErrorImpl::NonIntegerLoopBound {
                            part: String::from(description),
                            received: ty.to_string(),
                        },
                    ));
                }
            }
            type_check_expr(checker, *body)?;
            Type::void()
        }
        Expr::Where { defs, expression } => {
            type_check_node(checker, *defs)?;
            type_check_expr(checker, *expression)?
        }
    };

    checker.store(id, ty)
}

/// Full traversal: checks every definition, including function bodies,
/// below `id`.
pub fn type_check_node(checker: &mut TypeChecker, id: NodeId) -> Result<(), Error> {
    let ast = checker.ast;

    match ast.kind(id) {
        NodeKind::Defs(defs) => {
            for def in defs {
                type_check_node(checker, *def)?;
            }
        }
        NodeKind::Def(Def::Fun(fun)) => {
            let Type::Function { return_type, .. } = resolve_definition(checker, id)? else {
                return Err(checker.internal_error(id, format!("{} has no signature", fun.name)));
            };

            let body_type = type_check_expr(checker, fun.body)?;
            if body_type != *return_type {
                return Err(checker.error_at(
                    fun.body,
                    ErrorImpl::ReturnTypeMismatch {
                        function: fun.name.clone(),
                        expected: return_type.to_string(),
                        received: body_type.to_string(),
                    },
                ));
            }
        }
        NodeKind::Def(_) => {
            resolve_definition(checker, id)?;
        }
        NodeKind::Expr(_) => {
            type_check_expr(checker, id)?;
        }
        NodeKind::Type(_) => {
            type_check_type(checker, id)?;
        }
    }

    Ok(())
}

/// Assigns a type to every definition, expression and type node of `ast`.
pub fn type_check(ast: &Ast, definitions: &SideTable<NodeId>) -> Result<SideTable<Type>, Error> {
    let mut checker = TypeChecker::new(ast, definitions);

    if let Some(root) = ast.root() {
        type_check_node(&mut checker, root)?;
    }

    debug!(typed = checker.types.len(), "type checked");
    Ok(checker.types)
}
