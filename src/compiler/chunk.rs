use std::fmt::{self, Display, Formatter};

use crate::frames::{access::Access, frame::Frame};

use super::ir::IrStmt;

/// A unit of output handed to code generation.
#[derive(Debug, Clone, PartialEq)]
pub enum Chunk {
    /// Body of one function, storing its result at `MEM(FP)`
    Code { frame: Frame, body: IrStmt },
    /// Bytes of one string literal
    Data { access: Access, value: String },
    /// Storage of one top-level variable
    Global { access: Access },
}

impl Display for Chunk {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Chunk::Code { frame, body } => {
                writeln!(f, "{}", frame)?;
                body.write_indented(f, 1)
            }
            Chunk::Data { access, value } => {
                writeln!(f, "DATA {} '{}'", access, value.replace('\'', "''"))
            }
            Chunk::Global { access } => writeln!(f, "GLOBAL {}", access),
        }
    }
}
