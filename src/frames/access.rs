use std::fmt::Display;

use super::frame::Label;

/// Where the value of a definition is stored.
#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    Global {
        size: u32,
        label: Label,
    },
    /// Offset from the frame pointer of the function at `static_level`
    Local {
        size: u32,
        offset: i32,
        static_level: u32,
    },
    Parameter {
        size: u32,
        offset: i32,
        static_level: u32,
    },
}

impl Display for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Access::Global { size, label } => write!(f, "Global(size: {}, label: {})", size, label),
            Access::Local {
                size,
                offset,
                static_level,
            } => write!(
                f,
                "Local(size: {}, offset: {}, sl: {})",
                size, offset, static_level
            ),
            Access::Parameter {
                size,
                offset,
                static_level,
            } => write!(
                f,
                "Parameter(size: {}, offset: {}, sl: {})",
                size, offset, static_level
            ),
        }
    }
}
