//! Structural errors surfaced by graph construction and finalization.

use thiserror::Error;

/// Errors raised while building or finalizing a dataflow graph.
///
/// Every variant is fatal to the operation that raised it; the graph is never
/// left in a partially rewritten state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// Unrecognized backend or alignment profile at graph creation.
    /// No graph exists after this error.
    #[error("unrecognized configuration: {reason}")]
    Configuration { reason: String },

    /// Construction protocol misuse, such as overlapping sessions or a
    /// duplicate node name. Graph state before the failing call remains valid.
    #[error("usage error: {reason}")]
    Usage { reason: String },

    /// A reorder node without exactly one output tensor was encountered
    /// during coalescing.
    #[error("reorder node `{node}` has {outputs} output tensors, expected exactly one")]
    UnsupportedGraphShape { node: String, outputs: usize },

    /// Adjacency or positional invariants were found broken while a pass was
    /// mutating the graph.
    #[error("graph invariant violated: {reason}")]
    InvariantViolation { reason: String },
}

impl GraphError {
    pub(crate) fn usage(reason: impl Into<String>) -> Self {
        GraphError::Usage {
            reason: reason.into(),
        }
    }

    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        GraphError::Configuration {
            reason: reason.into(),
        }
    }

    pub(crate) fn invariant(reason: impl Into<String>) -> Self {
        GraphError::InvariantViolation {
            reason: reason.into(),
        }
    }
}
