//! Tensor metadata shared between graph construction and serialization.
//!
//! The tensor module defines dtypes, storage formats, and the immutable
//! [`TensorDescriptor`] values that graph nodes exchange. No numeric payload
//! lives here; storage belongs to the downstream backend.

mod descriptor;
pub mod dtype;

pub use descriptor::{DataFormat, OutputSpec, TensorDescriptor};
pub use dtype::DType;
