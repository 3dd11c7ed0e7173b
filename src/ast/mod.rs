/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The node arena, node ids and the generic node record
/// - definitions: Function, variable, type and parameter definitions
/// - expressions: Definitions for the various expression kinds
/// - types: Type expressions as written in the source
pub mod ast;
pub mod definitions;
pub mod expressions;
pub mod types;

#[cfg(test)]
mod tests;
