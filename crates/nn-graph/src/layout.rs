//! Tensor layout vocabulary and layout-set helpers.
//!
//! Operators accept a small set of canonical physical layouts. This module
//! defines the shared layout enum, axis permutation helpers for the 4D
//! layouts, and the bitmask sets used to describe which layouts an operator
//! accepts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical dimension-ordering convention of a tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layout {
    /// Channel-first 4D layout.
    Nchw,
    /// Channel-last 4D layout.
    Nhwc,
    /// Batched 2D layout (batch, channels).
    Nc,
    /// Rank-agnostic flat layout.
    Flat,
}

impl Layout {
    /// All layouts in their canonical (bit-value) order.
    pub const ALL: [Layout; 4] = [Layout::Nchw, Layout::Nhwc, Layout::Nc, Layout::Flat];

    /// Bit value used by [`LayoutSet`] masks.
    pub const fn bit(self) -> u8 {
        match self {
            Layout::Nchw => 1 << 0,
            Layout::Nhwc => 1 << 1,
            Layout::Nc => 1 << 2,
            Layout::Flat => 1 << 3,
        }
    }

    pub const fn perm_nchw_to_nhwc() -> [usize; 4] {
        [0, 2, 3, 1]
    }

    pub const fn perm_nhwc_to_nchw() -> [usize; 4] {
        [0, 3, 1, 2]
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layout::Nchw => "NCHW",
            Layout::Nhwc => "NHWC",
            Layout::Nc => "NC",
            Layout::Flat => "Flat",
        };
        f.write_str(name)
    }
}

/// Computes the dimensions a reorder from one layout to another produces.
///
/// The NCHW/NHWC pair permutes axes; reordering a 4D layout to NC flattens
/// everything past the batch dimension; every other combination leaves the
/// dimensions untouched. Conversions defined only on rank-4 input return
/// `None` for other ranks.
pub fn permute_dims(dims: &[usize], from: Layout, to: Layout) -> Option<Vec<usize>> {
    let perm: [usize; 4] = match (from, to) {
        (Layout::Nchw, Layout::Nhwc) => Layout::perm_nchw_to_nhwc(),
        (Layout::Nhwc, Layout::Nchw) => Layout::perm_nhwc_to_nchw(),
        (Layout::Nchw | Layout::Nhwc, Layout::Nc) => {
            if dims.len() != 4 {
                return None;
            }
            return Some(vec![dims[0], dims[1..].iter().product()]);
        }
        _ => return Some(dims.to_vec()),
    };
    if dims.len() != 4 {
        return None;
    }
    Some(perm.iter().map(|&axis| dims[axis]).collect())
}

/// Bitmask set of layouts, used to describe the layouts an operator accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct LayoutSet(u8);

impl LayoutSet {
    pub const fn empty() -> Self {
        LayoutSet(0)
    }

    pub fn of(layouts: &[Layout]) -> Self {
        let mut set = LayoutSet::empty();
        for &layout in layouts {
            set.insert(layout);
        }
        set
    }

    pub fn insert(&mut self, layout: Layout) {
        self.0 |= layout.bit();
    }

    pub fn remove(&mut self, layout: Layout) {
        self.0 &= !layout.bit();
    }

    pub fn contains(self, layout: Layout) -> bool {
        self.0 & layout.bit() != 0
    }

    pub fn overlaps_with(self, other: LayoutSet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// First layout contained in the set, in canonical order. Keeps layout
    /// selection deterministic when converting a tensor into an accepted set.
    pub fn first(self) -> Option<Layout> {
        Layout::ALL.into_iter().find(|layout| self.contains(*layout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_set_membership() {
        let mut set = LayoutSet::of(&[Layout::Nchw, Layout::Nc]);
        assert!(set.contains(Layout::Nchw));
        assert!(!set.contains(Layout::Nhwc));
        assert!(set.overlaps_with(LayoutSet::of(&[Layout::Nc, Layout::Flat])));
        set.remove(Layout::Nchw);
        assert!(!set.contains(Layout::Nchw));
        assert_eq!(set.first(), Some(Layout::Nc));
    }

    #[test]
    fn permute_dims_between_4d_layouts() {
        assert_eq!(
            permute_dims(&[1, 3, 8, 8], Layout::Nchw, Layout::Nhwc),
            Some(vec![1, 8, 8, 3])
        );
        assert_eq!(
            permute_dims(&[1, 8, 8, 3], Layout::Nhwc, Layout::Nchw),
            Some(vec![1, 3, 8, 8])
        );
        assert_eq!(permute_dims(&[4, 16], Layout::Nc, Layout::Flat), Some(vec![4, 16]));
        assert_eq!(permute_dims(&[4, 16], Layout::Nchw, Layout::Nhwc), None);
    }

    #[test]
    fn reorder_to_nc_flattens_past_the_batch_axis() {
        assert_eq!(
            permute_dims(&[2, 3, 4, 4], Layout::Nchw, Layout::Nc),
            Some(vec![2, 48])
        );
        assert_eq!(permute_dims(&[2, 48], Layout::Nchw, Layout::Nc), None);
    }
}
