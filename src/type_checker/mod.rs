//! Type checking and semantic analysis module.
//!
//! Assigns a semantic [`types::Type`] to every definition, expression and
//! type node, and validates the PINS typing rules:
//!
//! - Operators receive operands of the right atom types
//! - Calls match the callee's parameter count and types
//! - Conditions are logical and loop bounds are integers
//! - Function bodies agree with the declared return type
//!
//! Definition types are resolved on demand, so a definition may be used
//! before it appears in the source. Type aliases that refer back to
//! themselves are reported as cycles.

pub mod type_checker;
pub mod types;

#[cfg(test)]
mod tests;
