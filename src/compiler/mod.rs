//! IR lowering.
//!
//! This module turns a checked and laid out AST into intermediate
//! representation trees and the chunks consumed by code generation:
//!
//! - One code chunk per function
//! - One data chunk per string literal
//! - One global chunk per top-level variable
//!
//! It also drives the whole pipeline through [`compiler::compile`].

pub mod chunk;
pub mod compiler;
pub mod expr;
pub mod ir;
pub mod stdlib;
pub mod stmt;
