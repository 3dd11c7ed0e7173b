use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{Ast, NodeId, NodeKind},
        definitions::{Def, DefKind},
        expressions::Expr,
        types::TypeNode,
    },
    compiler::stdlib::is_builtin,
    errors::errors::{Error, ErrorImpl},
    side_table::SideTable,
};

use super::symbol_table::SymbolTable;

/// Walks the tree once, recording for every `Name`, `Call` and type name
/// the definition it resolves to.
pub struct NameChecker<'a> {
    ast: &'a Ast,
    symbol_table: SymbolTable,
    definitions: SideTable<NodeId>,
}

impl<'a> NameChecker<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        NameChecker {
            ast,
            symbol_table: SymbolTable::new(),
            definitions: SideTable::new(),
        }
    }

    fn error_at(&self, id: NodeId, error: ErrorImpl) -> Error {
        Error::new(error, self.ast.span(id).start.clone())
    }

    /// Looks `name` up and checks the definition is one of `accepted`.
    fn resolve(
        &mut self,
        reference: NodeId,
        name: &str,
        expected: &str,
        accepted: &[DefKind],
    ) -> Result<(), Error> {
        let Some(definition) = self.symbol_table.definition_for(name) else {
            return Err(self.error_at(
                reference,
                ErrorImpl::UndefinedSymbol {
                    name: String::from(name),
                },
            ));
        };

        let found = match self.ast.def(definition) {
            Some(def) => def.kind(),
            None => {
                return Err(self.error_at(
                    reference,
                    ErrorImpl::InternalError {
                        message: format!("symbol {} is bound to a non-definition", name),
                    },
                ))
            }
        };

        if !accepted.contains(&found) {
            return Err(self.error_at(
                reference,
                ErrorImpl::WrongKindReference {
                    name: String::from(name),
                    expected: String::from(expected),
                    found: found.to_string(),
                },
            ));
        }

        trace!(name, reference = %reference, definition = %definition, "resolved name");
        self.definitions
            .store(reference, definition)
            .map_err(|_| {
                self.error_at(
                    reference,
                    ErrorImpl::InternalError {
                        message: format!("reference {} resolved twice", reference),
                    },
                )
            })
    }

    fn insert(&mut self, definition: NodeId) -> Result<(), Error> {
        let Some(def) = self.ast.def(definition) else {
            return Err(self.error_at(
                definition,
                ErrorImpl::InternalError {
                    message: format!("{} is not a definition", definition),
                },
            ));
        };

        self.symbol_table
            .insert(def.name(), definition)
            .map_err(|_| {
                self.error_at(
                    definition,
                    ErrorImpl::DuplicateDefinitionInScope {
                        name: String::from(def.name()),
                    },
                )
            })
    }

    pub fn visit(&mut self, id: NodeId) -> Result<(), Error> {
        let ast = self.ast;

        match ast.kind(id) {
            NodeKind::Defs(defs) => {
                // Everything in the list is visible before any body is checked
                for def in defs {
                    self.insert(*def)?;
                }
                for def in defs {
                    self.visit(*def)?;
                }
                Ok(())
            }
            NodeKind::Def(def) => self.visit_def(def),
            NodeKind::Expr(expr) => self.visit_expr(id, expr),
            NodeKind::Type(type_node) => self.visit_type(id, type_node),
        }
    }

    fn visit_def(&mut self, def: &Def) -> Result<(), Error> {
        match def {
            Def::Fun(fun) => {
                // Signature types resolve in the enclosing scope
                self.visit(fun.return_type)?;
                for parameter in &fun.parameters {
                    if let Some(Def::Parameter(parameter)) = self.ast.def(*parameter) {
                        self.visit(parameter.ty)?;
                    }
                }

                self.symbol_table.push_scope();
                let result = fun
                    .parameters
                    .iter()
                    .try_for_each(|parameter| self.insert(*parameter))
                    .and_then(|_| self.visit(fun.body));
                self.symbol_table.pop_scope();

                result
            }
            Def::Var(var) => self.visit(var.ty),
            Def::Type(type_def) => self.visit(type_def.ty),
            // Inserted and typed by the owning function
            Def::Parameter(_) => Ok(()),
        }
    }

    fn visit_expr(&mut self, id: NodeId, expr: &Expr) -> Result<(), Error> {
        match expr {
            Expr::Call { name, arguments } => {
                // Built-in routines are never bound, whatever is in scope
                if !is_builtin(name) {
                    self.resolve(id, name, "function", &[DefKind::Function])?;
                }

                for argument in arguments {
                    self.visit(*argument)?;
                }
                Ok(())
            }
            Expr::Name { name } => self.resolve(
                id,
                name,
                "variable",
                &[DefKind::Variable, DefKind::Parameter],
            ),
            Expr::Where { defs, expression } => {
                self.symbol_table.push_scope();
                let result = self.visit(*defs).and_then(|_| self.visit(*expression));
                self.symbol_table.pop_scope();

                result
            }
            _ => {
                for child in expr.children() {
                    self.visit(child)?;
                }
                Ok(())
            }
        }
    }

    fn visit_type(&mut self, id: NodeId, type_node: &TypeNode) -> Result<(), Error> {
        match type_node {
            TypeNode::Atom(_) => Ok(()),
            TypeNode::Array { element, .. } => self.visit(*element),
            TypeNode::Name { name } => self.resolve(id, name, "type", &[DefKind::Type]),
        }
    }
}

/// Resolves every name in `ast`, returning the reference → definition table.
pub fn check_names(ast: &Ast) -> Result<SideTable<NodeId>, Error> {
    let mut checker = NameChecker::new(ast);

    if let Some(root) = ast.root() {
        checker.visit(root)?;
    }

    debug!(bindings = checker.definitions.len(), "resolved names");
    Ok(checker.definitions)
}
