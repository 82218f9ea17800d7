use nn_graph::{
    AlignmentProfile, Backend, DType, Graph, GraphError, Layout, NodeParams, OpType, OutputSpec,
    TensorDescriptor,
};

fn empty_graph(name: &str) -> Graph {
    Graph::new(name, Backend::Reference, AlignmentProfile::Unaligned)
        .expect("reference/unaligned is a recognized pairing")
}

/// Every parent/child edge must be recorded on both endpoints.
fn assert_mutual_consistency(graph: &Graph) {
    for node in graph.nodes() {
        for parent in &node.parents {
            let parent_node = graph.node(parent).expect("parent exists");
            assert!(
                parent_node.children.contains(&node.name),
                "`{}` lists parent `{parent}` but is missing from its children",
                node.name
            );
        }
        for child in &node.children {
            let child_node = graph.node(child).expect("child exists");
            assert!(
                child_node.parents.contains(&node.name),
                "`{}` lists child `{child}` but is missing from its parents",
                node.name
            );
        }
    }
}

#[test]
fn add_node_wires_adjacency_in_input_order() -> Result<(), GraphError> {
    let mut graph = empty_graph("net");
    let a = graph.add_node(
        "a",
        OpType::Data,
        &[],
        OutputSpec::new(vec![1, 4], Layout::Nc),
        NodeParams::new(),
    )?;
    let b = graph.add_node(
        "b",
        OpType::Data,
        &[],
        OutputSpec::new(vec![1, 4], Layout::Nc),
        NodeParams::new(),
    )?;

    let sum = graph.add_node(
        "sum",
        OpType::EltwiseAdd,
        &[b.clone(), a.clone()],
        OutputSpec::new(vec![1, 4], Layout::Nc),
        NodeParams::new(),
    )?;

    let node = graph.node("sum").expect("sum exists");
    assert_eq!(node.parents.as_slice(), ["b".to_string(), "a".to_string()]);
    assert_eq!(node.input_tensors.len(), 2);
    assert_eq!(node.input_tensors[0].name(), "b");
    assert_eq!(node.input_tensors[1].name(), "a");

    assert_eq!(sum.source(), Some("sum"));
    assert_eq!(sum.alignment(), 0);
    assert_mutual_consistency(&graph);
    Ok(())
}

#[test]
fn inputs_without_a_source_contribute_no_parent() -> Result<(), GraphError> {
    let mut graph = empty_graph("net");
    let produced = graph.add_node(
        "a",
        OpType::Data,
        &[],
        OutputSpec::new(vec![1, 4], Layout::Nc),
        NodeParams::new(),
    )?;
    let external = TensorDescriptor::graph_input("weights", vec![8, 4], Layout::Nc, DType::F32);

    graph.add_node(
        "fc",
        OpType::InnerProduct,
        &[produced, external],
        OutputSpec::new(vec![1, 8], Layout::Nc),
        NodeParams::new(),
    )?;

    let node = graph.node("fc").expect("fc exists");
    assert_eq!(node.parents.as_slice(), ["a".to_string()]);
    assert_eq!(node.input_tensors.len(), 2, "both inputs are still recorded");
    assert_mutual_consistency(&graph);
    Ok(())
}

#[test]
fn duplicate_node_name_is_a_usage_error_and_leaves_graph_unchanged() -> Result<(), GraphError> {
    let mut graph = empty_graph("net");
    let a = graph.add_node(
        "a",
        OpType::Data,
        &[],
        OutputSpec::new(vec![1, 4], Layout::Nc),
        NodeParams::new(),
    )?;
    graph.add_node(
        "relu",
        OpType::Relu,
        &[a.clone()],
        OutputSpec::new(vec![1, 4], Layout::Nc),
        NodeParams::new(),
    )?;

    let before = graph.clone();
    let err = graph
        .add_node(
            "relu",
            OpType::Relu,
            &[a],
            OutputSpec::new(vec![1, 4], Layout::Nc),
            NodeParams::new(),
        )
        .expect_err("duplicate name must be rejected");
    assert!(matches!(err, GraphError::Usage { .. }));
    assert_eq!(graph, before, "failed call must not mutate the graph");
    Ok(())
}

#[test]
fn input_from_another_graph_is_a_usage_error() -> Result<(), GraphError> {
    let mut other = empty_graph("other");
    let foreign = other.add_node(
        "a",
        OpType::Data,
        &[],
        OutputSpec::new(vec![1, 4], Layout::Nc),
        NodeParams::new(),
    )?;

    let mut graph = empty_graph("net");
    let err = graph
        .add_node(
            "relu",
            OpType::Relu,
            &[foreign],
            OutputSpec::new(vec![1, 4], Layout::Nc),
            NodeParams::new(),
        )
        .expect_err("foreign producing node must be rejected");
    assert!(matches!(err, GraphError::Usage { .. }));
    assert!(graph.nodes().is_empty());
    Ok(())
}

#[test]
fn output_descriptor_carries_graph_alignment() -> Result<(), GraphError> {
    let mut graph = Graph::new("net", Backend::Smv, AlignmentProfile::Simd8)?;
    let out = graph.add_node(
        "a",
        OpType::Data,
        &[],
        OutputSpec::new(vec![1, 3, 8, 8], Layout::Nchw),
        NodeParams::new(),
    )?;
    assert_eq!(out.alignment(), 8);
    assert_eq!(out.dims(), &[1, 3, 8, 8]);
    assert_eq!(out.layout(), Layout::Nchw);
    Ok(())
}
