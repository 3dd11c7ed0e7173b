//! Main compiler module.
//!
//! This module contains the core Compiler structure and the compilation
//! pipeline from a parsed AST to IR chunks. Every pass annotates the AST
//! through a side table; lowering reads all of them and produces one IR tree
//! per expression plus the chunks handed to code generation.

use tracing::{debug, trace};

use crate::{
    ast::ast::{Ast, NodeId},
    errors::errors::{Error, ErrorImpl},
    frames::{
        access::Access,
        frame::{Frame, Label, LabelGenerator},
        frame_evaluator::{evaluate_frames, Layout},
    },
    name_checker::name_checker::check_names,
    side_table::SideTable,
    type_checker::{type_checker::type_check, types::Type},
};

use super::{
    chunk::Chunk,
    ir::IrNode,
    stmt::gen_definitions,
};

/// Everything known about a program once it has been lowered.
#[derive(Debug)]
pub struct Compilation {
    pub ast: Ast,
    /// Reference node to the definition it names
    pub definitions: SideTable<NodeId>,
    pub types: SideTable<Type>,
    pub frames: SideTable<Frame>,
    pub accesses: SideTable<Access>,
    pub ir: SideTable<IrNode>,
    /// In source traversal order
    pub chunks: Vec<Chunk>,
}

/// The state of IR lowering.
///
/// This structure holds:
/// - The AST and the side tables computed by the earlier passes
/// - The generator handing out fresh labels
/// - The IR computed so far and the emitted chunks
/// - The static level of the function being lowered
pub struct Compiler<'a> {
    /// The tree being lowered
    pub ast: &'a Ast,
    /// Definition bindings from name resolution
    pub definitions: &'a SideTable<NodeId>,
    /// Types from type checking
    pub types: &'a SideTable<Type>,
    /// Function frames from frame evaluation
    pub frames: &'a SideTable<Frame>,
    /// Storage of every variable, parameter and type definition
    pub accesses: &'a SideTable<Access>,

    /// Continues numbering where frame evaluation stopped
    pub labels: LabelGenerator,
    /// IR of every lowered node
    pub ir: SideTable<IrNode>,
    /// Emitted chunks
    pub chunks: Vec<Chunk>,

    /// Static level of the function whose body is being lowered, 0 outside
    /// any function
    pub static_level: u32,
}

impl<'a> Compiler<'a> {
    /// Creates a new Compiler instance.
    ///
    /// # Arguments
    ///
    /// * `ast` - The tree to lower
    /// * `definitions` - Definition bindings of every reference
    /// * `types` - Types of every node
    /// * `layout` - Frames and accesses of every definition
    /// * `labels` - The generator used while laying out frames
    pub fn new(
        ast: &'a Ast,
        definitions: &'a SideTable<NodeId>,
        types: &'a SideTable<Type>,
        layout: &'a Layout,
        labels: LabelGenerator,
    ) -> Self {
        Compiler {
            ast,
            definitions,
            types,
            frames: &layout.frames,
            accesses: &layout.accesses,
            labels,
            ir: SideTable::new(),
            chunks: vec![],
            static_level: 0,
        }
    }

    pub fn error_at(&self, id: NodeId, error: ErrorImpl) -> Error {
        Error::new(error, self.ast.span(id).start.clone())
    }

    pub fn internal_error(&self, id: NodeId, message: String) -> Error {
        self.error_at(id, ErrorImpl::InternalError { message })
    }

    pub fn type_of(&self, id: NodeId) -> Result<&'a Type, Error> {
        let types = self.types;
        types
            .value_for(id)
            .ok_or_else(|| self.internal_error(id, format!("{} has no type", id)))
    }

    pub fn access_of(&self, definition: NodeId) -> Result<&'a Access, Error> {
        let accesses = self.accesses;
        accesses
            .value_for(definition)
            .ok_or_else(|| self.internal_error(definition, format!("{} has no access", definition)))
    }

    pub fn frame_of(&self, function: NodeId) -> Result<&'a Frame, Error> {
        let frames = self.frames;
        frames
            .value_for(function)
            .ok_or_else(|| self.internal_error(function, format!("{} has no frame", function)))
    }

    /// The definition `reference` names, if any. Built-in calls have none.
    pub fn definition_of(&self, reference: NodeId) -> Option<NodeId> {
        self.definitions.value_for(reference).copied()
    }

    pub fn next_label(&mut self) -> Label {
        let label = self.labels.next_anonymous();
        trace!(label = %label, "generated label");
        label
    }

    pub fn store(&mut self, id: NodeId, ir: IrNode) -> Result<(), Error> {
        self.ir
            .store(id, ir)
            .map_err(|_| self.internal_error(id, format!("{} lowered twice", id)))
    }

    pub fn emit(&mut self, chunk: Chunk) {
        self.chunks.push(chunk);
    }
}

/// Lowers every function body of `ast` to IR and emits the program's chunks.
pub fn lower(
    ast: &Ast,
    definitions: &SideTable<NodeId>,
    types: &SideTable<Type>,
    layout: &Layout,
    labels: LabelGenerator,
) -> Result<(SideTable<IrNode>, Vec<Chunk>), Error> {
    let mut compiler = Compiler::new(ast, definitions, types, layout, labels);

    if let Some(root) = ast.root() {
        gen_definitions(&mut compiler, root)?;
    }

    debug!(
        ir = compiler.ir.len(),
        chunks = compiler.chunks.len(),
        "lowered to IR"
    );
    Ok((compiler.ir, compiler.chunks))
}

/// Resolves names, checks types, lays out frames and lowers `ast` to IR.
///
/// The first error of any pass stops the compilation.
pub fn compile(ast: Ast) -> Result<Compilation, Error> {
    let definitions = check_names(&ast)?;
    let types = type_check(&ast, &definitions)?;

    let mut labels = LabelGenerator::new();
    let layout = evaluate_frames(&ast, &definitions, &types, &mut labels)?;
    let (ir, chunks) = lower(&ast, &definitions, &types, &layout, labels)?;

    let Layout { frames, accesses } = layout;
    Ok(Compilation {
        ast,
        definitions,
        types,
        frames,
        accesses,
        ir,
        chunks,
    })
}
