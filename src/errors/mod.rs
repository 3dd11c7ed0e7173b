//! Error types and error handling for the compiler.
//!
//! This module defines the error types used throughout the compilation
//! process. It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for every compilation phase, from the
//!   tokenizer through name resolution and type checking
//! - Error formatting and display functionality
//!
//! Every phase is fail-fast: the first error is returned to the caller and
//! no further work is done.

pub mod errors;

#[cfg(test)]
mod tests;
