//! Write-once tables mapping AST nodes to values computed by a pass.

use std::collections::HashMap;

use crate::ast::ast::NodeId;

/// Returned when a node already has a value in a [`SideTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlreadyStored(pub NodeId);

/// Maps a node to at most one value. Values are never overwritten; a lookup
/// before the owning pass stores a value returns `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct SideTable<V> {
    values: HashMap<NodeId, V>,
}

impl<V> Default for SideTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> SideTable<V> {
    pub fn new() -> Self {
        SideTable {
            values: HashMap::new(),
        }
    }

    pub fn store(&mut self, node: NodeId, value: V) -> Result<(), AlreadyStored> {
        if self.values.contains_key(&node) {
            return Err(AlreadyStored(node));
        }

        self.values.insert(node, value);
        Ok(())
    }

    pub fn value_for(&self, node: NodeId) -> Option<&V> {
        self.values.get(&node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.values.contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries ordered by node id.
    pub fn entries(&self) -> Vec<(NodeId, &V)> {
        let mut entries: Vec<(NodeId, &V)> =
            self.values.iter().map(|(node, value)| (*node, value)).collect();
        entries.sort_by_key(|(node, _)| *node);
        entries
    }
}
