use std::fmt::Display;

use crate::Span;

use super::{definitions::Def, expressions::Expr, types::TypeNode};

/// Stable identity of a node inside an [`Ast`] arena.
///
/// Ids are handed out by [`Ast::add`] and are only meaningful for the arena
/// that produced them. Every side table in the compiler is keyed by them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node categories
///
/// Each pass matches exhaustively over these, so adding a variant forces
/// every pass to handle it.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A list of definitions sharing one scope: the program itself or the
    /// bindings of a `where` clause.
    Defs(Vec<NodeId>),
    Def(Def),
    Expr(Expr),
    Type(TypeNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

/// Arena holding every node of one compilation unit.
///
/// Nodes are immutable once added; passes annotate them through side tables
/// instead of mutating them.
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}

impl Ast {
    pub fn new() -> Self {
        Ast {
            nodes: vec![],
            root: None,
        }
    }

    pub fn add(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { kind, span });
        id
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    /// The top-level `Defs` node, if the parser produced one.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn span(&self, id: NodeId) -> &Span {
        &self.node(id).span
    }

    pub fn def(&self, id: NodeId) -> Option<&Def> {
        match self.kind(id) {
            NodeKind::Def(def) => Some(def),
            _ => None,
        }
    }

    pub fn expr(&self, id: NodeId) -> Option<&Expr> {
        match self.kind(id) {
            NodeKind::Expr(expr) => Some(expr),
            _ => None,
        }
    }

    pub fn type_node(&self, id: NodeId) -> Option<&TypeNode> {
        match self.kind(id) {
            NodeKind::Type(type_node) => Some(type_node),
            _ => None,
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Indented tree rendering of the subtree rooted at `id`.
    pub fn dump(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(id, 0, &mut out);
        out
    }

    /// One-line description of a node, without its children.
    pub fn describe(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Defs(_) => String::from("Defs"),
            NodeKind::Def(def) => def.to_string(),
            NodeKind::Expr(expr) => expr.to_string(),
            NodeKind::Type(type_node) => type_node.to_string(),
        }
    }

    fn dump_into(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = self.node(id);
        let indent = "  ".repeat(depth);

        let children = match &node.kind {
            NodeKind::Defs(defs) => defs.clone(),
            NodeKind::Def(def) => def.children(),
            NodeKind::Expr(expr) => expr.children(),
            NodeKind::Type(type_node) => type_node.children(),
        };

        out.push_str(&format!("{}{} {} [{}]\n", indent, id, self.describe(id), node.span));
        for child in children {
            self.dump_into(child, depth + 1, out);
        }
    }
}
