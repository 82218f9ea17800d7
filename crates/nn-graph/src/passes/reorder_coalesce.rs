//! Merges duplicate layout-conversion nodes inserted during construction.
//!
//! Automatic layout transformation can leave a parent with several reorder
//! children converting to the same layout, one per consumer, where a single
//! shared reorder suffices. This pass merges each such group into the first
//! reorder encountered in children-order, rewires every downstream consumer
//! to the survivor, and drops the redundant nodes from the graph sequence.

use std::collections::HashSet;

use crate::error::GraphError;
use crate::graph::{Graph, NodeIndex, OpType};
use crate::layout::Layout;

use super::{GraphPass, PassResult};

/// Per-parent deduplication of same-layout reorder children.
///
/// Deterministic: parents are visited in graph-sequence order and children in
/// children-order, so the canonical node for a `(parent, layout)` pair is
/// always the first reorder child encountered. The "seen layouts" record is
/// scoped per parent; the same layout reordered under two different parents
/// is untouched.
#[derive(Default)]
pub struct ReorderCoalescePass;

impl ReorderCoalescePass {
    const NAME: &'static str = "reorder-coalesce";
}

impl GraphPass for ReorderCoalescePass {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn run(&self, graph: &mut Graph) -> Result<PassResult, GraphError> {
        let index = NodeIndex::build(graph.nodes())?;
        let nodes = graph.nodes_mut();
        let mut stats = PassResult::default();

        // Graph-sequence positions of nodes merged away, applied at the end.
        let mut removed: HashSet<usize> = HashSet::new();

        for parent_pos in 0..nodes.len() {
            if removed.contains(&parent_pos) {
                continue;
            }

            let child_names: Vec<String> = nodes[parent_pos].children.iter().cloned().collect();
            let mut seen: Vec<(Layout, usize)> = Vec::new();
            let mut dropped_slots: Vec<usize> = Vec::new();

            for (slot, child_name) in child_names.iter().enumerate() {
                let child_pos = index.require(child_name)?;
                // A node merged under an earlier parent is already rewired;
                // its husk stays in the sequence until the final sweep.
                if removed.contains(&child_pos) {
                    continue;
                }
                if nodes[child_pos].op != OpType::Reorder {
                    continue;
                }

                let output_count = nodes[child_pos].output_tensors.len();
                let Some(output) = nodes[child_pos].sole_output() else {
                    return Err(GraphError::UnsupportedGraphShape {
                        node: child_name.clone(),
                        outputs: output_count,
                    });
                };
                let layout = output.layout();

                let Some(&(_, canonical_pos)) =
                    seen.iter().find(|(recorded, _)| *recorded == layout)
                else {
                    seen.push((layout, child_pos));
                    continue;
                };

                removed.insert(child_pos);
                dropped_slots.push(slot);

                let canonical_name = nodes[canonical_pos].name.clone();
                let grandchildren: Vec<String> =
                    nodes[child_pos].children.iter().cloned().collect();

                // Rewire each grandchild to the canonical reorder, keeping
                // the parent entry at the exact position it held: downstream
                // consumers resolve input tensors positionally through
                // `parents`.
                for grandchild_name in &grandchildren {
                    let grandchild_pos = index.require(grandchild_name)?;
                    let grandchild = &mut nodes[grandchild_pos];
                    let parent_slot = grandchild
                        .parents
                        .iter()
                        .position(|parent| parent == child_name)
                        .ok_or_else(|| {
                            GraphError::invariant(format!(
                                "node `{grandchild_name}` has no parent entry for \
                                 merged reorder `{child_name}`"
                            ))
                        })?;
                    grandchild.parents[parent_slot] = canonical_name.clone();
                    stats.rewritten_parent_refs += 1;
                }

                nodes[canonical_pos].children.extend(grandchildren);
                stats.merged_nodes += 1;
                stats.changed = true;
            }

            if !dropped_slots.is_empty() {
                let dropped: HashSet<usize> = dropped_slots.into_iter().collect();
                let mut slot = 0;
                nodes[parent_pos].children.retain(|_| {
                    let keep = !dropped.contains(&slot);
                    slot += 1;
                    keep
                });
            }
        }

        // Delete from the highest sequence index down so earlier removals
        // never shift a position that is still pending.
        let mut positions: Vec<usize> = removed.into_iter().collect();
        positions.sort_unstable_by(|a, b| b.cmp(a));
        for pos in positions {
            nodes.remove(pos);
        }

        Ok(stats)
    }
}
