//! In-memory neural-network dataflow graphs for an external compiler.
//!
//! The crate builds an ordered graph of operator nodes and tensor
//! descriptors, then runs a finalization pass that coalesces the redundant
//! layout-conversion ("reorder") nodes automatic layout transformation leaves
//! behind. Construction goes through a [`GraphContext`], which admits one
//! [`GraphSession`] at a time; finishing a session finalizes the graph and
//! hands it back ready for the interchange serializer.
//!
//! ```
//! use nn_graph::{ops, AlignmentProfile, Backend, DType, GraphContext, Layout, TensorDescriptor};
//!
//! # fn main() -> Result<(), nn_graph::GraphError> {
//! let context = GraphContext::new();
//! let mut session = context.begin("cnn", Backend::Smv, AlignmentProfile::Simd8)?;
//! let image = TensorDescriptor::graph_input("image", vec![1, 3, 8, 8], Layout::Nchw, DType::F32);
//! let kernel = TensorDescriptor::graph_input("kernel", vec![4, 8, 3, 3], Layout::Nhwc, DType::F32);
//! let data = ops::input_data(&mut session, "data", &image)?;
//! let conv = ops::convolution(&mut session, "conv", &data, &kernel, [1, 1])?;
//! let _act = ops::relu(&mut session, "relu", &conv)?;
//! let graph = session.finish()?;
//! assert!(graph.node("conv/reorder").is_some());
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod error;
pub mod graph;
pub mod layout;
pub mod ops;
pub mod passes;
mod serialize;
pub mod tensor;

pub use backend::{AlignmentProfile, Backend};
pub use error::GraphError;
pub use graph::{AttrValue, Graph, GraphContext, GraphSession, Node, NodeParams, OpType};
pub use layout::{Layout, LayoutSet};
pub use tensor::{DType, DataFormat, OutputSpec, TensorDescriptor};
