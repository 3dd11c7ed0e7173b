//! Intermediate representation trees.
//!
//! Expressions compute a value, statements only have effects. The frame and
//! stack pointers are named addresses ([`frame_pointer`], [`stack_pointer`]).

use std::fmt::{self, Display, Formatter};

use crate::{
    ast::expressions::BinaryOperator,
    frames::frame::Label,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrOperator {
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
}

impl IrOperator {
    /// The operator computing `operator`, if it lowers to a plain binop.
    pub fn from_binary(operator: BinaryOperator) -> Option<IrOperator> {
        let operator = match operator {
            BinaryOperator::Or => IrOperator::Or,
            BinaryOperator::And => IrOperator::And,
            BinaryOperator::Eq => IrOperator::Eq,
            BinaryOperator::Neq => IrOperator::Neq,
            BinaryOperator::Lt => IrOperator::Lt,
            BinaryOperator::Gt => IrOperator::Gt,
            BinaryOperator::Leq => IrOperator::Leq,
            BinaryOperator::Geq => IrOperator::Geq,
            BinaryOperator::Add => IrOperator::Add,
            BinaryOperator::Sub => IrOperator::Sub,
            BinaryOperator::Mul => IrOperator::Mul,
            BinaryOperator::Div => IrOperator::Div,
            BinaryOperator::Mod => IrOperator::Mod,
            BinaryOperator::Index | BinaryOperator::Assign => return None,
        };

        Some(operator)
    }
}

impl Display for IrOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            IrOperator::Or => "|",
            IrOperator::And => "&",
            IrOperator::Eq => "==",
            IrOperator::Neq => "!=",
            IrOperator::Lt => "<",
            IrOperator::Gt => ">",
            IrOperator::Leq => "<=",
            IrOperator::Geq => ">=",
            IrOperator::Add => "+",
            IrOperator::Sub => "-",
            IrOperator::Mul => "*",
            IrOperator::Div => "/",
            IrOperator::Mod => "%",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IrExpr {
    Constant(i32),
    /// Address of a label
    Name(Label),
    /// Value stored at an address
    Memory(Box<IrExpr>),
    Binop {
        operator: IrOperator,
        left: Box<IrExpr>,
        right: Box<IrExpr>,
    },
    /// The first argument is always the static link
    Call {
        label: Label,
        arguments: Vec<IrExpr>,
    },
    /// Runs `statement`, then evaluates to `expression`
    Eseq {
        statement: Box<IrStmt>,
        expression: Box<IrExpr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum IrStmt {
    Move {
        destination: IrExpr,
        source: IrExpr,
    },
    /// Evaluates an expression for its effects
    Expr(IrExpr),
    Sequence(Vec<IrStmt>),
    Label(Label),
    Jump(Label),
    CJump {
        condition: IrExpr,
        true_label: Label,
        false_label: Label,
    },
}

/// IR computed for one AST node.
#[derive(Debug, Clone, PartialEq)]
pub enum IrNode {
    Expr(IrExpr),
    Stmt(IrStmt),
}

pub fn frame_pointer() -> IrExpr {
    IrExpr::Name(Label::named("{FP}"))
}

pub fn stack_pointer() -> IrExpr {
    IrExpr::Name(Label::named("{SP}"))
}

impl IrExpr {
    pub fn memory(address: IrExpr) -> IrExpr {
        IrExpr::Memory(Box::new(address))
    }

    pub fn binop(operator: IrOperator, left: IrExpr, right: IrExpr) -> IrExpr {
        IrExpr::Binop {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn eseq(statement: IrStmt, expression: IrExpr) -> IrExpr {
        IrExpr::Eseq {
            statement: Box::new(statement),
            expression: Box::new(expression),
        }
    }

    fn write_indented(&self, f: &mut Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);

        match self {
            IrExpr::Constant(value) => writeln!(f, "{}CONST {}", indent, value),
            IrExpr::Name(label) => writeln!(f, "{}NAME {}", indent, label),
            IrExpr::Memory(address) => {
                writeln!(f, "{}MEM", indent)?;
                address.write_indented(f, depth + 1)
            }
            IrExpr::Binop {
                operator,
                left,
                right,
            } => {
                writeln!(f, "{}BINOP {}", indent, operator)?;
                left.write_indented(f, depth + 1)?;
                right.write_indented(f, depth + 1)
            }
            IrExpr::Call { label, arguments } => {
                writeln!(f, "{}CALL {}", indent, label)?;
                for argument in arguments {
                    argument.write_indented(f, depth + 1)?;
                }
                Ok(())
            }
            IrExpr::Eseq {
                statement,
                expression,
            } => {
                writeln!(f, "{}ESEQ", indent)?;
                statement.write_indented(f, depth + 1)?;
                expression.write_indented(f, depth + 1)
            }
        }
    }
}

impl IrStmt {
    pub fn write_indented(&self, f: &mut Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);

        match self {
            IrStmt::Move {
                destination,
                source,
            } => {
                writeln!(f, "{}MOVE", indent)?;
                destination.write_indented(f, depth + 1)?;
                source.write_indented(f, depth + 1)
            }
            IrStmt::Expr(expression) => {
                writeln!(f, "{}EXP", indent)?;
                expression.write_indented(f, depth + 1)
            }
            IrStmt::Sequence(statements) => {
                writeln!(f, "{}SEQ", indent)?;
                for statement in statements {
                    statement.write_indented(f, depth + 1)?;
                }
                Ok(())
            }
            IrStmt::Label(label) => writeln!(f, "{}LABEL {}", indent, label),
            IrStmt::Jump(label) => writeln!(f, "{}JUMP {}", indent, label),
            IrStmt::CJump {
                condition,
                true_label,
                false_label,
            } => {
                writeln!(f, "{}CJUMP {} {}", indent, true_label, false_label)?;
                condition.write_indented(f, depth + 1)
            }
        }
    }
}

impl Display for IrExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

impl Display for IrStmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

impl Display for IrNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            IrNode::Expr(expression) => expression.fmt(f),
            IrNode::Stmt(statement) => statement.fmt(f),
        }
    }
}
