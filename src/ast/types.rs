use std::fmt::Display;

use super::{ast::NodeId, expressions::AtomKind};

/// Type expressions as they appear in source, before resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    Atom(AtomKind),
    /// `arr[size] element`
    Array { size: u32, element: NodeId },
    /// Reference to a `typ` definition
    Name { name: String },
}

impl TypeNode {
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            TypeNode::Array { element, .. } => vec![*element],
            _ => vec![],
        }
    }
}

impl Display for TypeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeNode::Atom(kind) => write!(f, "Atom {}", kind),
            TypeNode::Array { size, .. } => write!(f, "Array [{}]", size),
            TypeNode::Name { name } => write!(f, "TypeName {}", name),
        }
    }
}
