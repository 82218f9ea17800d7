//! End-to-end: operator constructors auto-insert reorders, finalization
//! merges the duplicates, and the result round-trips through the
//! interchange encoding.

use anyhow::Result;
use nn_graph::{
    ops, AlignmentProfile, Backend, DType, Graph, GraphContext, Layout, OpType, TensorDescriptor,
};

fn nchw_image() -> TensorDescriptor {
    TensorDescriptor::graph_input("image", vec![1, 3, 8, 8], Layout::Nchw, DType::F32)
}

fn nhwc_kernel(name: &str) -> TensorDescriptor {
    TensorDescriptor::graph_input(name, vec![4, 3, 3, 3], Layout::Nhwc, DType::F32)
}

#[test]
fn shared_input_convolutions_share_one_reorder_after_finalize() -> Result<()> {
    let context = GraphContext::new();
    let mut session = context.begin("cnn", Backend::Smv, AlignmentProfile::Simd8)?;

    let data = ops::input_data(&mut session, "data", &nchw_image())?;
    // Each convolution needs NHWC input and inserts its own reorder.
    let conv0 = ops::convolution(&mut session, "conv0", &data, &nhwc_kernel("k0"), [1, 1])?;
    let conv1 = ops::convolution(&mut session, "conv1", &data, &nhwc_kernel("k1"), [1, 1])?;
    ops::relu(&mut session, "relu0", &conv0)?;
    ops::relu(&mut session, "relu1", &conv1)?;

    assert!(session.graph().node("conv0/reorder").is_some());
    assert!(session.graph().node("conv1/reorder").is_some());

    let graph = session.finish()?;

    assert!(graph.node("conv0/reorder").is_some(), "first reorder survives");
    assert!(graph.node("conv1/reorder").is_none(), "duplicate merged away");

    let shared = graph.node("conv0/reorder").expect("shared reorder");
    assert_eq!(
        shared.children.as_slice(),
        ["conv0".to_string(), "conv1".to_string()]
    );

    let conv1_node = graph.node("conv1").expect("conv1");
    assert_eq!(conv1_node.parents.as_slice(), ["conv0/reorder".to_string()]);

    let data_node = graph.node("data").expect("data");
    assert_eq!(data_node.children.as_slice(), ["conv0/reorder".to_string()]);
    Ok(())
}

#[test]
fn accepted_layouts_insert_no_reorder() -> Result<()> {
    let context = GraphContext::new();
    let mut session = context.begin("cnn", Backend::Reference, AlignmentProfile::Unaligned)?;

    // Reference convolutions take NCHW directly.
    let data = ops::input_data(&mut session, "data", &nchw_image())?;
    let kernel =
        TensorDescriptor::graph_input("k0", vec![4, 3, 3, 3], Layout::Nchw, DType::F32);
    ops::convolution(&mut session, "conv0", &data, &kernel, [1, 1])?;

    let graph = session.finish()?;
    assert!(graph
        .nodes()
        .iter()
        .all(|node| node.op != OpType::Reorder));
    Ok(())
}

#[test]
fn explicit_reorder_permutes_output_dims() -> Result<()> {
    let context = GraphContext::new();
    let mut session = context.begin("net", Backend::Reference, AlignmentProfile::Unaligned)?;
    let data = ops::input_data(&mut session, "data", &nchw_image())?;
    let reordered = ops::reorder(&mut session, "to_nhwc", &data, Layout::Nhwc)?;
    assert_eq!(reordered.dims(), &[1, 8, 8, 3]);
    assert_eq!(reordered.layout(), Layout::Nhwc);
    Ok(())
}

#[test]
fn fully_connected_heads_share_one_flatten_reorder() -> Result<()> {
    let context = GraphContext::new();
    let mut session = context.begin("mlp", Backend::Reference, AlignmentProfile::Unaligned)?;

    let data = ops::input_data(&mut session, "data", &nchw_image())?;
    let pool = ops::max_pooling(&mut session, "pool", &data, 2)?;
    assert_eq!(pool.dims(), &[1, 3, 4, 4]);

    // Both heads need NC input; each inserts a flattening reorder off `pool`.
    let w0 = TensorDescriptor::graph_input("w0", vec![10, 48], Layout::Nc, DType::F32);
    let w1 = TensorDescriptor::graph_input("w1", vec![10, 48], Layout::Nc, DType::F32);
    let fc0 = ops::inner_product(&mut session, "fc0", &pool, &w0)?;
    let fc1 = ops::inner_product(&mut session, "fc1", &pool, &w1)?;
    assert_eq!(fc0.dims(), &[1, 10]);
    let sum = ops::eltwise_add(&mut session, "sum", &fc0, &fc1)?;
    assert_eq!(sum.dims(), &[1, 10]);

    let graph = session.finish()?;
    assert!(graph.node("fc0/reorder").is_some());
    assert!(graph.node("fc1/reorder").is_none(), "duplicate flatten merged");

    let shared = graph.node("fc0/reorder").expect("shared flatten reorder");
    assert_eq!(shared.output_tensors[0].dims(), &[1, 48]);
    assert_eq!(
        shared.children.as_slice(),
        ["fc0".to_string(), "fc1".to_string()]
    );
    let sum_node = graph.node("sum").expect("sum");
    assert_eq!(
        sum_node.parents.as_slice(),
        ["fc0".to_string(), "fc1".to_string()]
    );
    Ok(())
}

#[test]
fn finalized_graph_round_trips_through_interchange_bytes() -> Result<()> {
    let context = GraphContext::new();
    let mut session = context.begin("cnn", Backend::Smv, AlignmentProfile::Simd8)?;
    let data = ops::input_data(&mut session, "data", &nchw_image())?;
    let conv0 = ops::convolution(&mut session, "conv0", &data, &nhwc_kernel("k0"), [1, 1])?;
    ops::convolution(&mut session, "conv1", &data, &nhwc_kernel("k1"), [1, 1])?;
    ops::relu(&mut session, "relu0", &conv0)?;
    let graph = session.finish()?;

    let bytes = graph.to_bytes()?;
    let decoded = Graph::from_bytes(&bytes)?;
    assert_eq!(decoded, graph);

    let path = std::env::temp_dir().join(graph.default_file_name());
    graph.write_to(&path)?;
    let from_disk = Graph::from_bytes(&std::fs::read(&path)?)?;
    assert_eq!(from_disk, graph);
    std::fs::remove_file(&path).ok();
    Ok(())
}

#[test]
fn summary_enumerates_nodes_and_tensors() -> Result<()> {
    let context = GraphContext::new();
    let mut session = context.begin("cnn", Backend::Smv, AlignmentProfile::Simd8)?;
    let data = ops::input_data(&mut session, "data", &nchw_image())?;
    ops::convolution(&mut session, "conv0", &data, &nhwc_kernel("k0"), [1, 1])?;
    let graph = session.finish()?;

    let mut out = Vec::new();
    graph.write_summary(&mut out)?;
    let text = String::from_utf8(out)?;
    assert!(text.contains("Summary of the network: cnn (SMV)"));
    assert!(text.contains("Name: conv0 (Convolution3d)"));
    assert!(text.contains("Name: conv0/reorder (Reorder)"));
    assert!(text.contains("alignment(8)"));
    Ok(())
}
