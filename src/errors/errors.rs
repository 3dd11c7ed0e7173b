use std::fmt::Display;

use thiserror::Error;

use crate::{type_checker::types::MAX_OBJECT_SIZE, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::InvalidStringCharacter { .. } => "InvalidStringCharacter",
            ErrorImpl::InvalidIdentifier { .. } => "InvalidIdentifier",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UndefinedSymbol { .. } => "UndefinedSymbol",
            ErrorImpl::WrongKindReference { .. } => "WrongKindReference",
            ErrorImpl::DuplicateDefinitionInScope { .. } => "DuplicateDefinitionInScope",
            ErrorImpl::OperandTypeMismatch { .. } => "OperandTypeMismatch",
            ErrorImpl::ArgumentCountMismatch { .. } => "ArgumentCountMismatch",
            ErrorImpl::ArgumentTypeMismatch { .. } => "ArgumentTypeMismatch",
            ErrorImpl::NonBooleanCondition { .. } => "NonBooleanCondition",
            ErrorImpl::NonIntegerLoopBound { .. } => "NonIntegerLoopBound",
            ErrorImpl::AssignmentTypeMismatch { .. } => "AssignmentTypeMismatch",
            ErrorImpl::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            ErrorImpl::UndefinedType { .. } => "UndefinedType",
            ErrorImpl::CyclicTypeDefinition { .. } => "CyclicTypeDefinition",
            ErrorImpl::IndexOnNonArray { .. } => "IndexOnNonArray",
            ErrorImpl::TypeTooLarge { .. } => "TypeTooLarge",
            ErrorImpl::FrameTooLarge { .. } => "FrameTooLarge",
            ErrorImpl::InternalError { .. } => "InternalError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnterminatedString => ErrorTip::Suggestion(String::from(
                "String literals must be closed with `'` on the same line",
            )),
            ErrorImpl::InvalidStringCharacter { character } => ErrorTip::Suggestion(format!(
                "Character {:?} is not allowed, strings may only contain printable ASCII",
                character
            )),
            ErrorImpl::InvalidIdentifier { token } => ErrorTip::Suggestion(format!(
                "`{}` is not a valid name, names cannot start with a digit",
                token
            )),
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UndefinedSymbol { name } => {
                ErrorTip::Suggestion(format!("`{}` is not defined", name))
            }
            ErrorImpl::WrongKindReference {
                name,
                expected,
                found,
            } => ErrorTip::Suggestion(format!(
                "`{}` is a {}, expected a {}",
                name, found, expected
            )),
            ErrorImpl::DuplicateDefinitionInScope { name } => {
                ErrorTip::Suggestion(format!("`{}` is already defined in this scope", name))
            }
            ErrorImpl::OperandTypeMismatch { operator, received } => ErrorTip::Suggestion(
                format!("Operator `{}` cannot be applied to `{}`", operator, received),
            ),
            ErrorImpl::ArgumentCountMismatch {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` expects {} arguments, received {}",
                function, expected, received
            )),
            ErrorImpl::ArgumentTypeMismatch {
                function,
                index,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Argument {} of `{}` should be `{}`, received `{}`",
                index + 1,
                function,
                expected,
                received
            )),
            ErrorImpl::NonBooleanCondition { received } => ErrorTip::Suggestion(format!(
                "Conditions must be `logical`, received `{}`",
                received
            )),
            ErrorImpl::NonIntegerLoopBound { part, received } => ErrorTip::Suggestion(format!(
                "Loop {} must be `integer`, received `{}`",
                part, received
            )),
            ErrorImpl::AssignmentTypeMismatch { left, right } => ErrorTip::Suggestion(format!(
                "Cannot assign `{}` to `{}`, only matching integer, logical or string values can be assigned",
                right, left
            )),
            ErrorImpl::ReturnTypeMismatch {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` is declared to return `{}`, but its body has type `{}`",
                function, expected, received
            )),
            ErrorImpl::UndefinedType { name } => {
                ErrorTip::Suggestion(format!("Type `{}` has no definition", name))
            }
            ErrorImpl::CyclicTypeDefinition { name } => ErrorTip::Suggestion(format!(
                "Type `{}` is defined in terms of itself",
                name
            )),
            ErrorImpl::IndexOnNonArray { received } => {
                ErrorTip::Suggestion(format!("Only arrays can be indexed, found `{}`", received))
            }
            ErrorImpl::TypeTooLarge { ty } => ErrorTip::Suggestion(format!(
                "A value of type `{}` would not fit in {} bytes",
                ty, MAX_OBJECT_SIZE
            )),
            ErrorImpl::FrameTooLarge { name } => ErrorTip::Suggestion(format!(
                "Storage for `{}` would grow its frame beyond {} bytes",
                name, MAX_OBJECT_SIZE
            )),
            ErrorImpl::InternalError { message } => {
                ErrorTip::Suggestion(format!("Internal compiler error: {}", message))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Tokenizer
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("invalid character {character:?} in string literal")]
    InvalidStringCharacter { character: char },
    #[error("invalid identifier: {token:?}")]
    InvalidIdentifier { token: String },

    // Parser
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },

    // Name resolution
    #[error("undefined symbol {name:?}")]
    UndefinedSymbol { name: String },
    #[error("{name:?} is a {found}, expected a {expected}")]
    WrongKindReference {
        name: String,
        expected: String,
        found: String,
    },
    #[error("{name:?} is already defined in this scope")]
    DuplicateDefinitionInScope { name: String },

    // Type checking
    #[error("operator {operator} cannot be applied to {received}")]
    OperandTypeMismatch { operator: String, received: String },
    #[error("{function:?} expects {expected} arguments, received {received}")]
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("argument {index} of {function:?}: expected {expected}, received {received}")]
    ArgumentTypeMismatch {
        function: String,
        index: usize,
        expected: String,
        received: String,
    },
    #[error("condition must be logical, received {received}")]
    NonBooleanCondition { received: String },
    #[error("loop {part} must be integer, received {received}")]
    NonIntegerLoopBound { part: String, received: String },
    #[error("cannot assign {right} to {left}")]
    AssignmentTypeMismatch { left: String, right: String },
    #[error("{function:?} returns {expected}, body has type {received}")]
    ReturnTypeMismatch {
        function: String,
        expected: String,
        received: String,
    },
    #[error("undefined type {name:?}")]
    UndefinedType { name: String },
    #[error("cyclic definition of type {name:?}")]
    CyclicTypeDefinition { name: String },
    #[error("cannot index into {received}")]
    IndexOnNonArray { received: String },
    #[error("type {ty} is too large")]
    TypeTooLarge { ty: String },

    // Frame layout
    #[error("{name:?} does not fit in its frame")]
    FrameTooLarge { name: String },

    #[error("internal error: {message}")]
    InternalError { message: String },
}
