//! Immutable per-tensor metadata flowing between graph nodes.

use serde::{Deserialize, Serialize};

use crate::layout::Layout;

use super::dtype::DType;

/// Physical storage format of a tensor's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataFormat {
    /// Dense row-major storage.
    Uncompressed,
    /// Compressed sparse-row packed storage.
    Csr,
}

/// Immutable value describing one tensor: shape, layout, dtype, storage
/// format, alignment, and (for operator outputs) the producing node.
///
/// A descriptor with a `source` is conceptually owned by its producing node;
/// descriptors without one are graph inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorDescriptor {
    name: String,
    dims: Vec<usize>,
    layout: Layout,
    dtype: DType,
    data_format: DataFormat,
    alignment: usize,
    source: Option<String>,
}

impl TensorDescriptor {
    pub(crate) fn new(
        name: impl Into<String>,
        dims: Vec<usize>,
        layout: Layout,
        dtype: DType,
        data_format: DataFormat,
        alignment: usize,
        source: Option<String>,
    ) -> Self {
        TensorDescriptor {
            name: name.into(),
            dims,
            layout,
            dtype,
            data_format,
            alignment,
            source,
        }
    }

    /// Describes a graph input: a tensor no node in the graph produces.
    pub fn graph_input(
        name: impl Into<String>,
        dims: Vec<usize>,
        layout: Layout,
        dtype: DType,
    ) -> Self {
        TensorDescriptor::new(
            name,
            dims,
            layout,
            dtype,
            DataFormat::Uncompressed,
            0,
            None,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn data_format(&self) -> DataFormat {
        self.data_format
    }

    pub fn alignment(&self) -> usize {
        self.alignment
    }

    /// Name of the node producing this tensor, or `None` for graph inputs.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

/// Output tensor specification supplied to `add_node`.
///
/// Bundles the caller-controlled fields of the single output descriptor each
/// node creates; the graph contributes the alignment and source fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpec {
    pub dims: Vec<usize>,
    pub layout: Layout,
    pub dtype: DType,
    pub data_format: DataFormat,
}

impl OutputSpec {
    /// Specification with the default dtype (`F32`) and storage format
    /// (`Uncompressed`).
    pub fn new(dims: Vec<usize>, layout: Layout) -> Self {
        OutputSpec {
            dims,
            layout,
            dtype: DType::F32,
            data_format: DataFormat::Uncompressed,
        }
    }

    pub fn with_dtype(mut self, dtype: DType) -> Self {
        self.dtype = dtype;
        self
    }

    pub fn with_data_format(mut self, data_format: DataFormat) -> Self {
        self.data_format = data_format;
        self
    }
}
