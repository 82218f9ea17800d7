//! Finalization passes run before a graph is handed to the serializer.

mod reorder_coalesce;

use crate::error::GraphError;
use crate::graph::Graph;

pub use reorder_coalesce::ReorderCoalescePass;

/// Result returned by a [`GraphPass`] after it runs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassResult {
    /// Whether the pass changed the graph.
    pub changed: bool,
    /// Nodes removed from the graph sequence.
    pub merged_nodes: usize,
    /// `parents` entries rewritten in place on downstream nodes.
    pub rewritten_parent_refs: usize,
}

impl PassResult {
    /// Merges two run results, accumulating statistics.
    pub fn merge(self, other: PassResult) -> PassResult {
        PassResult {
            changed: self.changed || other.changed,
            merged_nodes: self.merged_nodes + other.merged_nodes,
            rewritten_parent_refs: self.rewritten_parent_refs + other.rewritten_parent_refs,
        }
    }
}

/// Canonical interface implemented by finalization passes that mutate a
/// whole graph.
pub trait GraphPass {
    fn name(&self) -> &'static str;
    fn run(&self, graph: &mut Graph) -> Result<PassResult, GraphError>;
}
