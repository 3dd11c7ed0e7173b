use std::collections::HashMap;

use crate::ast::ast::NodeId;

/// Stack of scopes mapping names to their defining node.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, NodeId>>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// A table holding only the global scope.
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        // The global scope is never popped
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Number of open scopes, the global one included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Adds `name` to the innermost scope. Fails with the existing definition
    /// if the name is already taken there.
    pub fn insert(&mut self, name: &str, definition: NodeId) -> Result<(), NodeId> {
        let innermost = self.scopes.len() - 1;
        let scope = &mut self.scopes[innermost];

        if let Some(existing) = scope.get(name) {
            return Err(*existing);
        }

        scope.insert(String::from(name), definition);
        Ok(())
    }

    /// Innermost definition of `name`.
    pub fn definition_for(&self, name: &str) -> Option<NodeId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }
}
