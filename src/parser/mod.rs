//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into the arena-allocated AST. It uses a Pratt parser for expressions
//! with proper operator precedence and handles:
//!
//! - Definition parsing (`fun`, `var`, `typ`, parameters)
//! - Expression parsing (binary and prefix operators, calls, indexing,
//!   blocks, assignments, `if`/`while`/`for` and `where` clauses)
//! - Type parsing for type annotations
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.
//! Parsing is fail-fast: the first syntax error is returned.

pub mod defs;
pub mod expr;
pub mod lookups;
pub mod parser;
pub mod types;
