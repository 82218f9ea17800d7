//! Name-to-position lookup built on demand over a graph's node sequence.

use std::collections::HashMap;

use crate::error::GraphError;

use super::node::Node;

/// Positional index over a node sequence.
///
/// Built fresh by the coalescing pass in graph-sequence order, so lookups and
/// the traversal that produced them agree on positions. Positions refer to
/// the sequence the index was built from; they become stale once nodes are
/// removed.
#[derive(Debug)]
pub struct NodeIndex {
    pos_of: HashMap<String, usize>,
}

impl NodeIndex {
    /// Builds the index with a single forward walk over `nodes`.
    ///
    /// A duplicate node name here means construction-time checks were
    /// bypassed, which is an invariant violation rather than a usage error.
    pub fn build(nodes: &[Node]) -> Result<Self, GraphError> {
        let mut pos_of = HashMap::with_capacity(nodes.len());
        for (pos, node) in nodes.iter().enumerate() {
            if pos_of.insert(node.name.clone(), pos).is_some() {
                return Err(GraphError::invariant(format!(
                    "duplicate node name `{}` in graph sequence",
                    node.name
                )));
            }
        }
        Ok(NodeIndex { pos_of })
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.pos_of.get(name).copied()
    }

    /// Position of `name`, or an invariant violation naming the dangling
    /// adjacency reference.
    pub fn require(&self, name: &str) -> Result<usize, GraphError> {
        self.position(name).ok_or_else(|| {
            GraphError::invariant(format!("adjacency references unknown node `{name}`"))
        })
    }

    pub fn len(&self) -> usize {
        self.pos_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pos_of.is_empty()
    }
}
