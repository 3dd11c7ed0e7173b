use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("arr", TokenKind::Arr);
        map.insert("else", TokenKind::Else);
        map.insert("for", TokenKind::For);
        map.insert("fun", TokenKind::Fun);
        map.insert("if", TokenKind::If);
        map.insert("then", TokenKind::Then);
        map.insert("typ", TokenKind::Typ);
        map.insert("var", TokenKind::Var);
        map.insert("where", TokenKind::Where);
        map.insert("while", TokenKind::While);

        map.insert("integer", TokenKind::IntegerType);
        map.insert("logical", TokenKind::LogicalType);
        map.insert("string", TokenKind::StringType);

        map.insert("true", TokenKind::Logical);
        map.insert("false", TokenKind::Logical);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Identifier,

    // Constants
    Integer,
    Logical,
    String,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,  // |
    And, // &

    Dot,
    Semicolon,
    Colon,
    Comma,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,

    // Reserved
    Arr,
    Else,
    For,
    Fun,
    If,
    Then,
    Typ,
    Var,
    Where,
    While,

    // Atom types
    IntegerType,
    LogicalType,
    StringType,
}

impl TokenKind {
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            TokenKind::Equals
                | TokenKind::NotEquals
                | TokenKind::Less
                | TokenKind::LessEquals
                | TokenKind::Greater
                | TokenKind::GreaterEquals
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if matches!(
            self.kind,
            TokenKind::Identifier | TokenKind::Integer | TokenKind::Logical | TokenKind::String
        ) {
            write!(f, "[{}] {}:{}", self.span, self.kind, self.value)
        } else {
            write!(f, "[{}] {}", self.span, self.kind)
        }
    }
}
