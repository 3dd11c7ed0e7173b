//! Unit tests for error handling.

use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::Position;
use std::rc::Rc;

fn position(line: u32, column: u32) -> Position {
    Position::new(line, column, Rc::new("test.pins".to_string()))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        position(1, 10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        position(4, 2),
    );

    assert_eq!(error.get_position().line, 4);
    assert_eq!(error.get_position().column, 2);
}

#[test]
fn test_error_kind_accessor() {
    let error = Error::new(
        ErrorImpl::CyclicTypeDefinition {
            name: "a".to_string(),
        },
        position(1, 1),
    );

    assert!(matches!(
        error.kind(),
        ErrorImpl::CyclicTypeDefinition { name } if name == "a"
    ));
}

#[test]
fn test_resolution_error_names() {
    let undefined = Error::new(
        ErrorImpl::UndefinedSymbol {
            name: "x".to_string(),
        },
        position(1, 1),
    );
    let wrong_kind = Error::new(
        ErrorImpl::WrongKindReference {
            name: "f".to_string(),
            expected: "variable".to_string(),
            found: "function".to_string(),
        },
        position(1, 1),
    );
    let duplicate = Error::new(
        ErrorImpl::DuplicateDefinitionInScope {
            name: "x".to_string(),
        },
        position(1, 1),
    );

    assert_eq!(undefined.get_error_name(), "UndefinedSymbol");
    assert_eq!(wrong_kind.get_error_name(), "WrongKindReference");
    assert_eq!(duplicate.get_error_name(), "DuplicateDefinitionInScope");
}

#[test]
fn test_type_error_names() {
    let cases = vec![
        (
            ErrorImpl::OperandTypeMismatch {
                operator: "+".to_string(),
                received: "integer, logical".to_string(),
            },
            "OperandTypeMismatch",
        ),
        (
            ErrorImpl::ArgumentCountMismatch {
                function: "f".to_string(),
                expected: 2,
                received: 1,
            },
            "ArgumentCountMismatch",
        ),
        (
            ErrorImpl::NonBooleanCondition {
                received: "integer".to_string(),
            },
            "NonBooleanCondition",
        ),
        (
            ErrorImpl::ReturnTypeMismatch {
                function: "f".to_string(),
                expected: "integer".to_string(),
                received: "logical".to_string(),
            },
            "ReturnTypeMismatch",
        ),
        (
            ErrorImpl::IndexOnNonArray {
                received: "integer".to_string(),
            },
            "IndexOnNonArray",
        ),
    ];

    for (kind, name) in cases {
        assert_eq!(Error::new(kind, position(1, 1)).get_error_name(), name);
    }
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        position(1, 1),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::WrongKindReference {
            name: "f".to_string(),
            expected: "variable".to_string(),
            found: "function".to_string(),
        },
        position(1, 1),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert_eq!(tip, "`f` is a function, expected a variable"),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_error_display_includes_position() {
    let error = Error::new(
        ErrorImpl::UndefinedSymbol {
            name: "y".to_string(),
        },
        position(3, 7),
    );

    assert_eq!(error.to_string(), "test.pins:3:7: undefined symbol \"y\"");
}

#[test]
fn test_size_error_names() {
    let type_too_large = Error::new(
        ErrorImpl::TypeTooLarge {
            ty: "arr[2000000000] integer".to_string(),
        },
        position(1, 8),
    );
    let frame_too_large = Error::new(
        ErrorImpl::FrameTooLarge {
            name: "b".to_string(),
        },
        position(1, 60),
    );

    assert_eq!(type_too_large.get_error_name(), "TypeTooLarge");
    assert_eq!(frame_too_large.get_error_name(), "FrameTooLarge");
    assert_eq!(
        frame_too_large.to_string(),
        "test.pins:1:60: \"b\" does not fit in its frame"
    );
}
