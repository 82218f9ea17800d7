//! Dataflow graph model and its construction protocol.
//!
//! A [`Graph`] owns an ordered node sequence; nodes reference each other by
//! name rather than by pointer, so parent/child adjacency forms no ownership
//! cycles and passes resolve names through a freshly built
//! [`NodeIndex`](index::NodeIndex). Construction appends nodes one at a time
//! through [`Graph::add_node`] (usually via a [`GraphSession`]); finalization
//! runs the reorder-coalescing pass and is the only step that removes nodes.

mod context;
pub mod index;
mod node;
mod summary;

use serde::{Deserialize, Serialize};

use crate::backend::{AlignmentProfile, Backend};
use crate::error::GraphError;
use crate::passes::{GraphPass, PassResult, ReorderCoalescePass};
use crate::tensor::{OutputSpec, TensorDescriptor};

pub use context::{GraphContext, GraphSession};
pub use index::NodeIndex;
pub use node::{AttrValue, Node, NodeParams, NodeRefList, OpType};

/// Ordered collection of named operator nodes targeting one backend.
///
/// Node order is the canonical traversal and serialization order: appends
/// preserve it and only pass-induced removals may shrink it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    name: String,
    backend: Backend,
    alignment: AlignmentProfile,
    nodes: Vec<Node>,
}

impl Graph {
    /// Creates an empty graph for a recognized backend/alignment pairing.
    ///
    /// An unsupported pairing fails with [`GraphError::Configuration`] before
    /// any graph exists.
    pub fn new(
        name: impl Into<String>,
        backend: Backend,
        alignment: AlignmentProfile,
    ) -> Result<Self, GraphError> {
        if !backend.supports(alignment) {
            return Err(GraphError::configuration(format!(
                "backend `{backend}` does not support alignment profile `{alignment}`"
            )));
        }
        Ok(Graph {
            name: name.into(),
            backend,
            alignment,
            nodes: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn alignment(&self) -> AlignmentProfile {
        self.alignment
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// Appends a node, wiring adjacency and producing its output descriptor.
    ///
    /// For each input tensor, in argument order: an input with a producing
    /// node contributes one `parents` entry (and the matching reverse
    /// `children` entry on the producer); an input without one contributes no
    /// parent entry. Exactly one output descriptor is created, carrying the
    /// graph's alignment and `source = name`.
    ///
    /// A duplicate node name fails with [`GraphError::Usage`] and leaves the
    /// graph untouched.
    pub fn add_node(
        &mut self,
        name: &str,
        op: OpType,
        input_tensors: &[TensorDescriptor],
        output: OutputSpec,
        params: NodeParams,
    ) -> Result<TensorDescriptor, GraphError> {
        if self.nodes.iter().any(|node| node.name == name) {
            return Err(GraphError::usage(format!(
                "node `{name}` already exists in graph `{}`",
                self.name
            )));
        }

        // Resolve every producing node up front so a dangling source leaves
        // no half-wired adjacency behind.
        let mut parent_positions = Vec::with_capacity(input_tensors.len());
        for tensor in input_tensors {
            match tensor.source() {
                Some(source) => {
                    let pos = self
                        .nodes
                        .iter()
                        .position(|node| node.name == source)
                        .ok_or_else(|| {
                            GraphError::usage(format!(
                                "input tensor `{}` names producing node `{source}` \
                                 which is not in graph `{}`",
                                tensor.name(),
                                self.name
                            ))
                        })?;
                    parent_positions.push(Some(pos));
                }
                None => parent_positions.push(None),
            }
        }

        let mut node = Node::new(name, op, params);
        for (tensor, parent_pos) in input_tensors.iter().zip(parent_positions) {
            if let Some(pos) = parent_pos {
                node.parents.push(self.nodes[pos].name.clone());
                self.nodes[pos].children.push(name.to_string());
            }
            node.input_tensors.push(tensor.clone());
        }

        let output_tensor = TensorDescriptor::new(
            name,
            output.dims,
            output.layout,
            output.dtype,
            output.data_format,
            self.alignment.element_alignment(),
            Some(name.to_string()),
        );
        node.output_tensors.push(output_tensor.clone());
        self.nodes.push(node);

        Ok(output_tensor)
    }

    /// Runs the finalization passes, coalescing redundant reorder nodes.
    ///
    /// Idempotent: a second invocation finds nothing to merge and reports
    /// `changed: false`.
    pub fn finalize(&mut self) -> Result<PassResult, GraphError> {
        ReorderCoalescePass.run(self)
    }
}
