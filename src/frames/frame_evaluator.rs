//! Frame layout: the activation record of every function and the storage
//! of every variable, parameter and type definition.

use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{Ast, NodeId, NodeKind},
        definitions::Def,
        expressions::Expr,
    },
    errors::errors::{Error, ErrorImpl},
    side_table::SideTable,
    type_checker::types::{Type, WORD_SIZE},
};

use super::{
    access::Access,
    frame::{Frame, FrameBuilder, Label, LabelGenerator},
};

/// Frames and accesses produced by [`evaluate_frames`].
#[derive(Debug)]
pub struct Layout {
    pub frames: SideTable<Frame>,
    pub accesses: SideTable<Access>,
}

/// Walks the AST once, building a frame per function and an access per
/// storage-owning definition.
pub struct FrameEvaluator<'a> {
    ast: &'a Ast,
    definitions: &'a SideTable<NodeId>,
    types: &'a SideTable<Type>,
    labels: &'a mut LabelGenerator,
    frames: SideTable<Frame>,
    accesses: SideTable<Access>,
    /// Frames of the functions enclosing the node being visited
    builders: Vec<FrameBuilder>,
    static_level: u32,
}

impl<'a> FrameEvaluator<'a> {
    pub fn new(
        ast: &'a Ast,
        definitions: &'a SideTable<NodeId>,
        types: &'a SideTable<Type>,
        labels: &'a mut LabelGenerator,
    ) -> Self {
        FrameEvaluator {
            ast,
            definitions,
            types,
            labels,
            frames: SideTable::new(),
            accesses: SideTable::new(),
            builders: vec![],
            static_level: 0,
        }
    }

    fn internal_error(&self, id: NodeId, message: String) -> Error {
        Error::new(
            ErrorImpl::InternalError { message },
            self.ast.span(id).start.clone(),
        )
    }

    fn type_of(&self, id: NodeId) -> Result<&'a Type, Error> {
        let types = self.types;
        types
            .value_for(id)
            .ok_or_else(|| self.internal_error(id, format!("{} has no type", id)))
    }

    fn error_at(&self, id: NodeId, error: ErrorImpl) -> Error {
        Error::new(error, self.ast.span(id).start.clone())
    }

    fn frame_too_large(&self, id: NodeId, name: &str) -> Error {
        self.error_at(
            id,
            ErrorImpl::FrameTooLarge {
                name: String::from(name),
            },
        )
    }

    /// Bytes `id` occupies in memory, or as an argument if `as_param`.
    fn size_of(&self, id: NodeId, as_param: bool) -> Result<u32, Error> {
        let ty = self.type_of(id)?;
        let size = if as_param {
            ty.size_in_bytes_as_param()
        } else {
            ty.size_in_bytes()
        };

        size.ok_or_else(|| self.error_at(id, ErrorImpl::TypeTooLarge { ty: ty.to_string() }))
    }

    fn current_builder(&mut self, id: NodeId) -> Result<&mut FrameBuilder, Error> {
        if self.builders.is_empty() {
            return Err(self.internal_error(id, String::from("local storage outside a function")));
        }

        let innermost = self.builders.len() - 1;
        Ok(&mut self.builders[innermost])
    }

    fn store_access(&mut self, id: NodeId, access: Access) -> Result<(), Error> {
        trace!(node = %id, access = %access, "assigned access");
        self.accesses
            .store(id, access)
            .map_err(|_| self.internal_error(id, format!("{} already has an access", id)))
    }

    /// Global at the top level, a local of the enclosing frame otherwise.
    fn allocate(&mut self, id: NodeId, name: &str) -> Result<(), Error> {
        let size = self.size_of(id, false)?;
        let static_level = self.static_level;

        let access = if static_level == 0 {
            Access::Global {
                size,
                label: Label::named(name),
            }
        } else {
            let Some(offset) = self.current_builder(id)?.add_local(size) else {
                return Err(self.frame_too_large(id, name));
            };
            Access::Local {
                size,
                offset,
                static_level,
            }
        };

        self.store_access(id, access)
    }

    fn visit_function(
        &mut self,
        id: NodeId,
        name: &str,
        parameters: &[NodeId],
        body: NodeId,
    ) -> Result<(), Error> {
        self.static_level += 1;
        let static_level = self.static_level;

        let label = if static_level == 1 {
            Label::named(name)
        } else {
            self.labels.next_anonymous()
        };

        let mut builder = FrameBuilder::new(label, static_level);
        // Static link
        if builder.add_parameter(WORD_SIZE).is_none() {
            return Err(self.frame_too_large(id, name));
        }

        for parameter in parameters {
            let size = self.size_of(*parameter, true)?;
            let Some(offset) = builder.add_parameter(size) else {
                let name = self.ast.def(*parameter).map_or(name, |def| def.name());
                return Err(self.frame_too_large(*parameter, name));
            };
            self.store_access(
                *parameter,
                Access::Parameter {
                    size,
                    offset,
                    static_level,
                },
            )?;
        }

        self.builders.push(builder);
        let result = self.visit(body);
        let builder = self.builders.pop();
        self.static_level -= 1;
        result?;

        let Some(builder) = builder else {
            return Err(self.internal_error(id, format!("frame of {} went missing", name)));
        };

        let frame = builder.build();
        trace!(function = name, frame = %frame, "built frame");
        self.frames
            .store(id, frame)
            .map_err(|_| self.internal_error(id, format!("{} already has a frame", name)))
    }

    fn visit_call(&mut self, id: NodeId, name: &str, arguments: &[NodeId]) -> Result<(), Error> {
        for argument in arguments {
            self.visit(*argument)?;
        }

        // Built-ins resolve to no definition and take no static link
        let mut size = if self.definitions.value_for(id).is_some() {
            WORD_SIZE
        } else {
            0
        };

        for argument in arguments {
            let argument_size = self.size_of(*argument, true)?;
            size = match size.checked_add(argument_size) {
                Some(size) => size,
                None => return Err(self.frame_too_large(id, name)),
            };
        }

        if !self.builders.is_empty() {
            self.current_builder(id)?.add_function_call(size);
        }
        Ok(())
    }

    pub fn visit(&mut self, id: NodeId) -> Result<(), Error> {
        let ast = self.ast;

        match ast.kind(id) {
            NodeKind::Defs(defs) => {
                for def in defs {
                    self.visit(*def)?;
                }
                Ok(())
            }
            NodeKind::Def(Def::Fun(fun)) => {
                self.visit_function(id, &fun.name, &fun.parameters, fun.body)
            }
            NodeKind::Def(Def::Var(var)) => self.allocate(id, &var.name),
            NodeKind::Def(Def::Type(type_def)) => self.allocate(id, &type_def.name),
            // Laid out together with their function
            NodeKind::Def(Def::Parameter(_)) => Ok(()),
            NodeKind::Expr(Expr::Call { name, arguments }) => self.visit_call(id, name, arguments),
            NodeKind::Expr(expr) => {
                for child in expr.children() {
                    self.visit(child)?;
                }
                Ok(())
            }
            NodeKind::Type(_) => Ok(()),
        }
    }
}

/// Lays out every function frame and assigns every variable, parameter and
/// type definition its storage.
pub fn evaluate_frames(
    ast: &Ast,
    definitions: &SideTable<NodeId>,
    types: &SideTable<Type>,
    labels: &mut LabelGenerator,
) -> Result<Layout, Error> {
    let mut evaluator = FrameEvaluator::new(ast, definitions, types, labels);

    if let Some(root) = ast.root() {
        evaluator.visit(root)?;
    }

    debug!(
        frames = evaluator.frames.len(),
        accesses = evaluator.accesses.len(),
        "laid out frames"
    );

    Ok(Layout {
        frames: evaluator.frames,
        accesses: evaluator.accesses,
    })
}
