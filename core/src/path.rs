//! Utilities for working with leaf paths.
//!
//! A path is the sequence of left/right turns from a leaf up to the root, one per level,
//! where `true` means the node at that level is a right child. Read as a little-endian bit
//! string, a path is exactly the index of the leaf it leads to.

use crate::{
    hasher::hash_with_sibling,
    tree::{Node, PROOF_DEPTH},
};
use alloc::vec::Vec;
use bitvec::prelude::*;
use core::fmt;

/// Two paths were expected to diverge but lead to the same leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdenticalPaths;

impl fmt::Display for IdenticalPaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "paths never diverge")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for IdenticalPaths {}

/// Interpret path indices as a little-endian bit string: `bits[0]` is the least
/// significant bit.
///
/// Only the first [`PROOF_DEPTH`] entries are considered, so the result is always below
/// [`crate::tree::CAPACITY`].
pub fn path_indices_to_index(bits: &[bool]) -> u32 {
    let mut index = 0u32;
    let view = index.view_bits_mut::<Lsb0>();
    for (level, &is_right) in bits.iter().take(PROOF_DEPTH).enumerate() {
        view.set(level, is_right);
    }
    index
}

/// The path leading to the leaf at `index`. The inverse of [`path_indices_to_index`] for
/// indices below [`crate::tree::CAPACITY`].
pub fn index_to_path_indices(index: u32) -> Vec<bool> {
    index.view_bits::<Lsb0>()[..PROOF_DEPTH]
        .iter()
        .by_vals()
        .collect()
}

/// Find the level at which two paths meet: the greatest `i` with `a[i] != b[i]`.
///
/// Paths run from the leaf upwards, so above this level the two paths coincide. The two
/// leaves' lowest common ancestor is the parent of the nodes at the returned level, and there
/// each path holds the other's subtree as its sibling.
pub fn find_lca_level(a: &[bool], b: &[bool]) -> Result<u8, IdenticalPaths> {
    a.iter()
        .zip(b)
        .take(PROOF_DEPTH)
        .rposition(|(x, y)| x != y)
        .map(|level| level as u8)
        .ok_or(IdenticalPaths)
}

/// Hash a leaf up through levels `0..level` only, returning the node at `level` on the
/// leaf's path.
///
/// A `level` of zero returns the leaf hash itself. Levels past the end of the proof stop at
/// the last available sibling.
pub fn hash_up_to_level(
    leaf_hash: Node,
    siblings: &[Node],
    path_indices: &[bool],
    level: u8,
) -> Node {
    siblings
        .iter()
        .zip(path_indices)
        .take(level as usize)
        .fold(leaf_hash, |node, (sibling, &is_right)| {
            hash_with_sibling(&node, sibling, is_right)
        })
}
