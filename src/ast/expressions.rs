use std::fmt::Display;

use super::ast::NodeId;

/// Lexical class of a literal, and of the atom types `integer`, `logical`
/// and `string`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomKind {
    Integer,
    Logical,
    String,
}

impl Display for AtomKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtomKind::Integer => write!(f, "integer"),
            AtomKind::Logical => write!(f, "logical"),
            AtomKind::String => write!(f, "string"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Or,
    And,
    Eq,
    Neq,
    Lt,
    Gt,
    Leq,
    Geq,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    /// `a[i]`
    Index,
    /// `{a = b}`
    Assign,
}

impl BinaryOperator {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Eq
                | BinaryOperator::Neq
                | BinaryOperator::Lt
                | BinaryOperator::Gt
                | BinaryOperator::Leq
                | BinaryOperator::Geq
        )
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOperator::Or => "|",
            BinaryOperator::And => "&",
            BinaryOperator::Eq => "==",
            BinaryOperator::Neq => "!=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Gt => ">",
            BinaryOperator::Leq => "<=",
            BinaryOperator::Geq => ">=",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::Index => "[]",
            BinaryOperator::Assign => "=",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOperator::Plus => write!(f, "+"),
            UnaryOperator::Minus => write!(f, "-"),
            UnaryOperator::Not => write!(f, "!"),
        }
    }
}

/// Expressions
///
/// Everything in PINS that computes a value is an expression, including
/// assignments and the control-flow forms.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Call {
        name: String,
        arguments: Vec<NodeId>,
    },
    Binary {
        left: NodeId,
        operator: BinaryOperator,
        right: NodeId,
    },
    /// `(e1, e2, ...)`, never empty
    Block {
        expressions: Vec<NodeId>,
    },
    For {
        /// A `Name` expression naming the loop counter
        counter: NodeId,
        low: NodeId,
        high: NodeId,
        step: NodeId,
        body: NodeId,
    },
    While {
        condition: NodeId,
        body: NodeId,
    },
    Name {
        name: String,
    },
    IfThenElse {
        condition: NodeId,
        then_expression: NodeId,
        else_expression: Option<NodeId>,
    },
    Literal {
        value: String,
        kind: AtomKind,
    },
    Unary {
        operator: UnaryOperator,
        expression: NodeId,
    },
    Where {
        /// A `Defs` node
        defs: NodeId,
        expression: NodeId,
    },
}

impl Expr {
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            Expr::Call { arguments, .. } => arguments.clone(),
            Expr::Binary { left, right, .. } => vec![*left, *right],
            Expr::Block { expressions } => expressions.clone(),
            Expr::For {
                counter,
                low,
                high,
                step,
                body,
            } => vec![*counter, *low, *high, *step, *body],
            Expr::While { condition, body } => vec![*condition, *body],
            Expr::Name { .. } => vec![],
            Expr::IfThenElse {
                condition,
                then_expression,
                else_expression,
            } => {
                let mut children = vec![*condition, *then_expression];
                children.extend(else_expression);
                children
            }
            Expr::Literal { .. } => vec![],
            Expr::Unary { expression, .. } => vec![*expression],
            Expr::Where { defs, expression } => vec![*defs, *expression],
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Call { name, .. } => write!(f, "Call {}", name),
            Expr::Binary { operator, .. } => write!(f, "Binary {}", operator),
            Expr::Block { .. } => write!(f, "Block"),
            Expr::For { .. } => write!(f, "For"),
            Expr::While { .. } => write!(f, "While"),
            Expr::Name { name } => write!(f, "Name {}", name),
            Expr::IfThenElse { .. } => write!(f, "IfThenElse"),
            Expr::Literal { value, kind } => write!(f, "Literal {} {:?}", kind, value),
            Expr::Unary { operator, .. } => write!(f, "Unary {}", operator),
            Expr::Where { .. } => write!(f, "Where"),
        }
    }
}
