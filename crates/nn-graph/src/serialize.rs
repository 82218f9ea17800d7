//! Opaque interchange encoding of finalized graphs.
//!
//! The byte format is owned by the downstream compiler; this module only
//! guarantees the structural contract — unique node names, canonical node
//! order, and positional `input_tensors`/`parents` correspondence — all of
//! which the in-memory [`Graph`] already maintains.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::graph::Graph;

impl Graph {
    /// Encodes the graph into interchange bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).with_context(|| format!("failed to encode graph `{}`", self.name()))
    }

    /// Decodes a graph from interchange bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Graph> {
        bincode::deserialize(bytes).context("failed to decode graph")
    }

    /// File name used when none is supplied to [`Graph::write_to`] callers.
    pub fn default_file_name(&self) -> String {
        format!("{}.nng", self.name())
    }

    /// Serializes the graph to a file.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        fs::write(path, bytes)
            .with_context(|| format!("failed to write graph to `{}`", path.display()))
    }
}
