use std::fmt::Display;

use crate::ast::expressions::AtomKind;

/// Size of one machine word in bytes.
pub const WORD_SIZE: u32 = 4;

/// Largest object addressable with a signed word offset.
pub const MAX_OBJECT_SIZE: u32 = i32::MAX as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomType {
    Int,
    Log,
    /// Address of externally stored bytes
    Str,
    Void,
}

/// Semantic types. Equality is structural.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Atom(AtomType),
    Array { size: u32, element: Box<Type> },
    Function {
        parameters: Vec<Type>,
        return_type: Box<Type>,
    },
}

impl From<AtomKind> for Type {
    fn from(kind: AtomKind) -> Self {
        match kind {
            AtomKind::Integer => Type::int(),
            AtomKind::Logical => Type::log(),
            AtomKind::String => Type::str(),
        }
    }
}

impl Type {
    pub fn int() -> Type {
        Type::Atom(AtomType::Int)
    }

    pub fn log() -> Type {
        Type::Atom(AtomType::Log)
    }

    pub fn str() -> Type {
        Type::Atom(AtomType::Str)
    }

    pub fn void() -> Type {
        Type::Atom(AtomType::Void)
    }

    pub fn array(size: u32, element: Type) -> Type {
        Type::Array {
            size,
            element: Box::new(element),
        }
    }

    /// Bytes a value of this type occupies in memory, `None` if that is
    /// more than [`MAX_OBJECT_SIZE`].
    pub fn size_in_bytes(&self) -> Option<u32> {
        let size = match self {
            Type::Atom(AtomType::Void) => 0,
            Type::Atom(_) => WORD_SIZE,
            Type::Array { size, element } => size.checked_mul(element.size_in_bytes()?)?,
            Type::Function { .. } => 0,
        };

        (size <= MAX_OBJECT_SIZE).then_some(size)
    }

    /// Bytes a value of this type occupies when passed as an argument.
    /// Arrays are passed by address.
    pub fn size_in_bytes_as_param(&self) -> Option<u32> {
        match self {
            Type::Array { .. } => Some(WORD_SIZE),
            _ => self.size_in_bytes(),
        }
    }

    pub fn is_int(&self) -> bool {
        *self == Type::int()
    }

    pub fn is_log(&self) -> bool {
        *self == Type::log()
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array { .. })
    }

    /// Only atoms with a value can be assigned as a whole.
    pub fn is_assignable(&self) -> bool {
        matches!(
            self,
            Type::Atom(AtomType::Int) | Type::Atom(AtomType::Log) | Type::Atom(AtomType::Str)
        )
    }

    pub fn element(&self) -> Option<&Type> {
        match self {
            Type::Array { element, .. } => Some(element),
            _ => None,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Atom(AtomType::Int) => write!(f, "integer"),
            Type::Atom(AtomType::Log) => write!(f, "logical"),
            Type::Atom(AtomType::Str) => write!(f, "string"),
            Type::Atom(AtomType::Void) => write!(f, "void"),
            Type::Array { size, element } => write!(f, "arr[{}] {}", size, element),
            Type::Function {
                parameters,
                return_type,
            } => {
                let parameters: Vec<String> = parameters.iter().map(Type::to_string).collect();
                write!(f, "({}) -> {}", parameters.join(", "), return_type)
            }
        }
    }
}
