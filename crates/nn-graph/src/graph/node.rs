//! Node records and their opaque attribute bags.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::tensor::TensorDescriptor;

/// Ordered adjacency list of node-name references. Most nodes have one or two
/// neighbours on either side.
pub type NodeRefList = SmallVec<[String; 2]>;

/// Operator vocabulary recognized by the downstream compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpType {
    Data,
    Convolution3d,
    MaxPooling,
    AveragePooling,
    InnerProduct,
    BatchNorm,
    EltwiseAdd,
    Relu,
    /// Converts a tensor's physical layout without altering its data.
    Reorder,
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpType::Data => "Data",
            OpType::Convolution3d => "Convolution3d",
            OpType::MaxPooling => "MaxPooling",
            OpType::AveragePooling => "AveragePooling",
            OpType::InnerProduct => "InnerProduct",
            OpType::BatchNorm => "BatchNorm",
            OpType::EltwiseAdd => "EltwiseAdd",
            OpType::Relu => "Relu",
            OpType::Reorder => "Reorder",
        };
        f.write_str(name)
    }
}

/// One operator in the graph.
///
/// `parents[i]` corresponds positionally to the i-th entry of `input_tensors`
/// that has a producing node; downstream consumers resolve operator inputs
/// through that correspondence, so passes may rewrite `parents` entries only
/// element-for-element, never reorder them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub op: OpType,
    pub parents: NodeRefList,
    pub children: NodeRefList,
    pub input_tensors: Vec<TensorDescriptor>,
    pub output_tensors: Vec<TensorDescriptor>,
    pub params: NodeParams,
}

impl Node {
    pub(crate) fn new(name: impl Into<String>, op: OpType, params: NodeParams) -> Self {
        Node {
            name: name.into(),
            op,
            parents: NodeRefList::new(),
            children: NodeRefList::new(),
            input_tensors: Vec::new(),
            output_tensors: Vec::new(),
            params,
        }
    }

    /// The node's sole output descriptor, when it has exactly one.
    pub fn sole_output(&self) -> Option<&TensorDescriptor> {
        match self.output_tensors.as_slice() {
            [single] => Some(single),
            _ => None,
        }
    }
}

/// Typed attribute value stored in a node's parameter bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Str(String),
    IntList(Vec<i64>),
}

/// Opaque per-node attribute bag.
///
/// Backed by a `BTreeMap` so serialized graphs are byte-stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeParams {
    entries: BTreeMap<String, AttrValue>,
}

impl NodeParams {
    pub fn new() -> Self {
        NodeParams::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: AttrValue) -> Self {
        self.entries.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
