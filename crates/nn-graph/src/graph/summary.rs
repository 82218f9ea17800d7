//! Human-readable graph dumps for inspection and debugging.

use std::fmt;
use std::io;

use crate::tensor::TensorDescriptor;

use super::Graph;

const RULE: &str = "=================================================================";
const NODE_RULE: &str = "-----------------------------------------------------------------";

impl Graph {
    /// Writes a per-node summary (name, op type, parents, children, tensor
    /// metadata) to `w`. Purely diagnostic; graph state is untouched.
    pub fn write_summary<W: io::Write>(&self, w: &mut W) -> io::Result<()> {
        write!(w, "{self}")
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(
            f,
            "      Summary of the network: {} ({})",
            self.name(),
            self.backend()
        )?;
        writeln!(f, "{RULE}")?;
        for node in self.nodes() {
            writeln!(f, "Name: {} ({})", node.name, node.op)?;
            write!(f, "Parents:")?;
            for parent in &node.parents {
                write!(f, " {parent}")?;
            }
            writeln!(f)?;
            write!(f, "Children:")?;
            for child in &node.children {
                write!(f, " {child}")?;
            }
            writeln!(f)?;
            writeln!(f, "Input tensors:")?;
            for tensor in &node.input_tensors {
                write_tensor_line(f, tensor)?;
            }
            writeln!(f, "Output tensors:")?;
            for tensor in &node.output_tensors {
                write_tensor_line(f, tensor)?;
            }
            writeln!(f, "{NODE_RULE}")?;
        }
        Ok(())
    }
}

fn write_tensor_line(f: &mut fmt::Formatter<'_>, tensor: &TensorDescriptor) -> fmt::Result {
    writeln!(
        f,
        "  {} {} {:?} {} alignment({})",
        tensor.name(),
        tensor.dtype(),
        tensor.dims(),
        tensor.layout(),
        tensor.alignment()
    )
}
