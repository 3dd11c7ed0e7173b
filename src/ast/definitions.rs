use std::fmt::Display;

use super::ast::NodeId;

#[derive(Debug, Clone, PartialEq)]
pub struct FunDef {
    pub name: String,
    pub parameters: Vec<NodeId>,
    pub return_type: NodeId,
    pub body: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDef {
    pub name: String,
    pub ty: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDef {
    pub name: String,
    pub ty: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: NodeId,
}

/// Definitions
///
/// Anything a name can be bound to.
#[derive(Debug, Clone, PartialEq)]
pub enum Def {
    Fun(FunDef),
    Var(VarDef),
    Type(TypeDef),
    Parameter(Parameter),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefKind {
    Function,
    Variable,
    Type,
    Parameter,
}

impl Display for DefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefKind::Function => write!(f, "function"),
            DefKind::Variable => write!(f, "variable"),
            DefKind::Type => write!(f, "type"),
            DefKind::Parameter => write!(f, "parameter"),
        }
    }
}

impl Def {
    pub fn name(&self) -> &str {
        match self {
            Def::Fun(def) => &def.name,
            Def::Var(def) => &def.name,
            Def::Type(def) => &def.name,
            Def::Parameter(def) => &def.name,
        }
    }

    pub fn kind(&self) -> DefKind {
        match self {
            Def::Fun(_) => DefKind::Function,
            Def::Var(_) => DefKind::Variable,
            Def::Type(_) => DefKind::Type,
            Def::Parameter(_) => DefKind::Parameter,
        }
    }

    pub fn children(&self) -> Vec<NodeId> {
        match self {
            Def::Fun(def) => {
                let mut children = def.parameters.clone();
                children.push(def.return_type);
                children.push(def.body);
                children
            }
            Def::Var(def) => vec![def.ty],
            Def::Type(def) => vec![def.ty],
            Def::Parameter(def) => vec![def.ty],
        }
    }
}

impl Display for Def {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Def::Fun(def) => write!(f, "FunDef {}", def.name),
            Def::Var(def) => write!(f, "VarDef {}", def.name),
            Def::Type(def) => write!(f, "TypeDef {}", def.name),
            Def::Parameter(def) => write!(f, "Parameter {}", def.name),
        }
    }
}
