//! Operator constructors with automatic layout conversion.
//!
//! Each constructor is a thin wrapper over [`GraphSession::add_node`] that
//! knows which input layouts its operator accepts on the target backend and
//! inserts a reorder node when an input does not match. Inserted reorders are
//! named `"<consumer>/reorder"`; because each consumer inserts its own, a
//! shared input can end up with several identical reorders, which the
//! finalization pass later coalesces.

use crate::backend::Backend;
use crate::error::GraphError;
use crate::graph::{AttrValue, GraphSession, NodeParams, OpType};
use crate::layout::{permute_dims, Layout, LayoutSet};
use crate::tensor::{OutputSpec, TensorDescriptor};

/// Input layouts an operator accepts, in positional order, plus the layout
/// its output is produced in.
#[derive(Debug, Clone)]
pub struct OperatorLayouts {
    pub inputs: Vec<LayoutSet>,
    pub output: Layout,
}

fn conv_layouts(backend: Backend) -> OperatorLayouts {
    let accepted = match backend {
        Backend::Reference => Layout::Nchw,
        Backend::Smv => Layout::Nhwc,
    };
    OperatorLayouts {
        inputs: vec![LayoutSet::of(&[accepted]); 2],
        output: accepted,
    }
}

/// Adds a `Data` node exposing a graph input tensor.
pub fn input_data(
    session: &mut GraphSession<'_>,
    name: &str,
    input: &TensorDescriptor,
) -> Result<TensorDescriptor, GraphError> {
    let output = OutputSpec::new(input.dims().to_vec(), input.layout()).with_dtype(input.dtype());
    session.add_node(
        name,
        OpType::Data,
        std::slice::from_ref(input),
        output,
        NodeParams::new(),
    )
}

/// Adds an explicit reorder node converting `input` to `target`.
pub fn reorder(
    session: &mut GraphSession<'_>,
    name: &str,
    input: &TensorDescriptor,
    target: Layout,
) -> Result<TensorDescriptor, GraphError> {
    let dims = permute_dims(input.dims(), input.layout(), target).ok_or_else(|| {
        GraphError::usage(format!(
            "cannot reorder rank-{} tensor `{}` from {} to {target}",
            input.rank(),
            input.name(),
            input.layout()
        ))
    })?;
    let output = OutputSpec::new(dims, target).with_dtype(input.dtype());
    session.add_node(
        name,
        OpType::Reorder,
        std::slice::from_ref(input),
        output,
        NodeParams::new(),
    )
}

/// Returns `input` unchanged when its layout is accepted, otherwise inserts
/// a `"<consumer>/reorder"` node converting it to the set's first layout.
fn to_accepted_layout(
    session: &mut GraphSession<'_>,
    input: &TensorDescriptor,
    accepted: LayoutSet,
    consumer: &str,
) -> Result<TensorDescriptor, GraphError> {
    if accepted.contains(input.layout()) {
        return Ok(input.clone());
    }
    let target = accepted.first().ok_or_else(|| {
        GraphError::invariant(format!("operator `{consumer}` accepts no layouts"))
    })?;
    reorder(session, &format!("{consumer}/reorder"), input, target)
}

/// Adds a 3D convolution over a 4D activation and a 4D weight tensor.
///
/// Same-padding convention: spatial dimensions are preserved and the output
/// channel count is the weights' outermost dimension.
pub fn convolution(
    session: &mut GraphSession<'_>,
    name: &str,
    input: &TensorDescriptor,
    weights: &TensorDescriptor,
    stride: [usize; 2],
) -> Result<TensorDescriptor, GraphError> {
    let layouts = conv_layouts(session.graph().backend());
    let input = to_accepted_layout(session, input, layouts.inputs[0], name)?;
    let weights = to_accepted_layout(session, weights, layouts.inputs[1], name)?;

    let out_channels = weights.dims()[0];
    let dims = match layouts.output {
        Layout::Nhwc => vec![
            input.dims()[0],
            input.dims()[1] / stride[0],
            input.dims()[2] / stride[1],
            out_channels,
        ],
        _ => vec![
            input.dims()[0],
            out_channels,
            input.dims()[2] / stride[0],
            input.dims()[3] / stride[1],
        ],
    };
    let params = NodeParams::new()
        .set("stride", AttrValue::IntList(vec![stride[0] as i64, stride[1] as i64]))
        .set("padding", AttrValue::Str("same".to_string()));
    session.add_node(
        name,
        OpType::Convolution3d,
        &[input, weights],
        OutputSpec::new(dims, layouts.output),
        params,
    )
}

/// Adds a fully-connected layer over a 2D activation and weight tensor.
pub fn inner_product(
    session: &mut GraphSession<'_>,
    name: &str,
    input: &TensorDescriptor,
    weights: &TensorDescriptor,
) -> Result<TensorDescriptor, GraphError> {
    let accepted = LayoutSet::of(&[Layout::Nc]);
    let input = to_accepted_layout(session, input, accepted, name)?;
    let dims = vec![input.dims()[0], weights.dims()[0]];
    session.add_node(
        name,
        OpType::InnerProduct,
        &[input, weights.clone()],
        OutputSpec::new(dims, Layout::Nc),
        NodeParams::new(),
    )
}

/// Adds a max-pooling node with a square window and matching stride.
pub fn max_pooling(
    session: &mut GraphSession<'_>,
    name: &str,
    input: &TensorDescriptor,
    pool_size: usize,
) -> Result<TensorDescriptor, GraphError> {
    let layouts = conv_layouts(session.graph().backend());
    let input = to_accepted_layout(session, input, layouts.inputs[0], name)?;
    let dims = match layouts.output {
        Layout::Nhwc => vec![
            input.dims()[0],
            input.dims()[1] / pool_size,
            input.dims()[2] / pool_size,
            input.dims()[3],
        ],
        _ => vec![
            input.dims()[0],
            input.dims()[1],
            input.dims()[2] / pool_size,
            input.dims()[3] / pool_size,
        ],
    };
    let params = NodeParams::new().set("pool_size", AttrValue::Int(pool_size as i64));
    session.add_node(
        name,
        OpType::MaxPooling,
        std::slice::from_ref(&input),
        OutputSpec::new(dims, layouts.output),
        params,
    )
}

/// Adds an elementwise addition of two same-shape tensors.
pub fn eltwise_add(
    session: &mut GraphSession<'_>,
    name: &str,
    lhs: &TensorDescriptor,
    rhs: &TensorDescriptor,
) -> Result<TensorDescriptor, GraphError> {
    let output = OutputSpec::new(lhs.dims().to_vec(), lhs.layout()).with_dtype(lhs.dtype());
    session.add_node(
        name,
        OpType::EltwiseAdd,
        &[lhs.clone(), rhs.clone()],
        output,
        NodeParams::new(),
    )
}

/// Adds a ReLU activation; layout-agnostic.
pub fn relu(
    session: &mut GraphSession<'_>,
    name: &str,
    input: &TensorDescriptor,
) -> Result<TensorDescriptor, GraphError> {
    let output = OutputSpec::new(input.dims().to_vec(), input.layout()).with_dtype(input.dtype());
    session.add_node(
        name,
        OpType::Relu,
        std::slice::from_ref(input),
        output,
        NodeParams::new(),
    )
}
