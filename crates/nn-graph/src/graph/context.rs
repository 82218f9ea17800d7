//! Explicit construction context enforcing one active session at a time.
//!
//! The context replaces a process-global "active graph" slot: callers create
//! a [`GraphContext`] and thread it to wherever graphs are built. A context
//! admits at most one live [`GraphSession`]; the slot is released when the
//! session finishes or is dropped.

use std::cell::Cell;

use crate::backend::{AlignmentProfile, Backend};
use crate::error::GraphError;
use crate::tensor::{OutputSpec, TensorDescriptor};

use super::{Graph, NodeParams, OpType};

/// Owner of the "at most one graph under construction" slot.
#[derive(Debug, Default)]
pub struct GraphContext {
    active: Cell<bool>,
}

impl GraphContext {
    pub fn new() -> Self {
        GraphContext::default()
    }

    /// Opens a construction session for a new graph.
    ///
    /// Fails with [`GraphError::Usage`] if another session on this context is
    /// still live, and with [`GraphError::Configuration`] for an unsupported
    /// backend/alignment pairing; in both cases the context state is
    /// unchanged.
    pub fn begin(
        &self,
        name: impl Into<String>,
        backend: Backend,
        alignment: AlignmentProfile,
    ) -> Result<GraphSession<'_>, GraphError> {
        if self.active.get() {
            return Err(GraphError::usage(
                "graph context already has an active construction session",
            ));
        }
        let graph = Graph::new(name, backend, alignment)?;
        self.active.set(true);
        Ok(GraphSession {
            context: self,
            graph: Some(graph),
        })
    }
}

/// Exclusive handle to a graph under construction.
///
/// Releases its context slot on drop. [`GraphSession::finish`] runs
/// finalization and hands the graph back for serialization.
#[derive(Debug)]
pub struct GraphSession<'a> {
    context: &'a GraphContext,
    graph: Option<Graph>,
}

impl GraphSession<'_> {
    pub fn graph(&self) -> &Graph {
        self.graph
            .as_ref()
            .expect("session graph taken before drop")
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        self.graph
            .as_mut()
            .expect("session graph taken before drop")
    }

    /// See [`Graph::add_node`].
    pub fn add_node(
        &mut self,
        name: &str,
        op: OpType,
        input_tensors: &[TensorDescriptor],
        output: OutputSpec,
        params: NodeParams,
    ) -> Result<TensorDescriptor, GraphError> {
        self.graph_mut()
            .add_node(name, op, input_tensors, output, params)
    }

    /// Finalizes the graph and returns it, releasing the context slot.
    ///
    /// The builder should treat the returned graph as read-only; it is ready
    /// for the serializer.
    pub fn finish(mut self) -> Result<Graph, GraphError> {
        let mut graph = self.graph.take().expect("session graph taken before drop");
        graph.finalize()?;
        Ok(graph)
    }
}

impl Drop for GraphSession<'_> {
    fn drop(&mut self) {
        self.context.active.set(false);
    }
}
