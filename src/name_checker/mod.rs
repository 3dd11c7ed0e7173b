//! Name resolution module.
//!
//! Binds every use of a name (variables, calls and type names) to the
//! definition it refers to, following PINS scoping rules:
//!
//! - All definitions of one `Defs` list are visible to each other, so
//!   forward references and mutual recursion work
//! - Function bodies and `where` clauses open a nested scope
//! - Parameters live in their function's scope, not the enclosing one
//!
//! Calls to the built-in runtime routines resolve to no definition.

pub mod name_checker;
pub mod symbol_table;
