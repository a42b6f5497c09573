//! This module defines the types of the indexed merkle tree.
//!
//! The tree has a fixed height of [`TREE_HEIGHT`]: a layer of `2^31` leaf slots and 31
//! levels of internal nodes above it. Every proof therefore carries exactly [`PROOF_DEPTH`]
//! siblings.
//!
//! Each occupied slot holds a [`Leaf`], whose `next_key` points at the next greater key in
//! the map, or at [`SENTINEL_KEY`] when the leaf holds the greatest key. Slots are filled
//! strictly left to right, so the occupied length of the tree is also the index of the next
//! slot to be filled.
//!
//! All nodes are 256 bits. Keys and values are 256 bit unsigned integers encoded big-endian,
//! so their numeric order is the lexicographic order of the byte arrays.

use alloc::vec::Vec;

/// A node in the binary tree. Always 256 bits: either a hash or [`EMPTY_LEAF`].
pub type Node = [u8; 32];

/// A key of the map, a big-endian 256 bit integer.
pub type Key = [u8; 32];

/// A value of the map, a big-endian 256 bit integer.
pub type Value = [u8; 32];

/// The height of the tree, counting the leaf layer.
pub const TREE_HEIGHT: usize = 32;

/// The number of siblings in a path from a leaf to the internal root.
pub const PROOF_DEPTH: usize = TREE_HEIGHT - 1;

/// The number of leaf slots in the tree.
pub const CAPACITY: u32 = 1 << PROOF_DEPTH;

/// The key terminating the sorted linked list. A leaf whose `next_key` is the sentinel holds
/// the greatest key in the map.
pub const SENTINEL_KEY: Key = [0u8; 32];

/// The node value of an unoccupied leaf slot.
///
/// This is never the hash of a [`Leaf`], so an empty slot can't be passed off as an
/// occupied one.
pub const EMPTY_LEAF: Node = [0u8; 32];

/// One slot of the sorted map.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Leaf {
    /// The key stored in this slot.
    pub key: Key,
    /// The value stored under `key`.
    pub value: Value,
    /// The next greater key in the map, or [`SENTINEL_KEY`].
    pub next_key: Key,
    /// The position of this leaf in the leaf layer. Not part of the leaf hash; it is implied
    /// by the position in the tree.
    pub index: u32,
}

impl Leaf {
    /// Create a new leaf.
    pub fn new(key: Key, value: Value, next_key: Key, index: u32) -> Self {
        Leaf {
            key,
            value,
            next_key,
            index,
        }
    }

    /// The leaf every map starts out with: the zero key, pointing at the sentinel, at index 0.
    pub fn genesis() -> Self {
        Leaf::default()
    }

    /// Whether this leaf holds the greatest key in the map.
    pub fn is_rightmost(&self) -> bool {
        self.next_key == SENTINEL_KEY
    }

    /// Whether `key` falls strictly inside the gap this leaf opens in the sorted list.
    pub fn covers_gap(&self, key: &Key) -> bool {
        self.key < *key && (self.is_rightmost() || *key < self.next_key)
    }
}

/// A leaf-to-root path through the tree.
///
/// Well-formed proofs hold exactly [`PROOF_DEPTH`] entries in each vector. The lengths are
/// checked by every verifier before any hashing is done.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MerkleProof {
    /// Sibling nodes, in ascending order by level. `siblings[0]` is the sibling of the leaf.
    pub siblings: Vec<Node>,
    /// Whether the node at each level is a right child.
    pub path_indices: Vec<bool>,
}

impl MerkleProof {
    /// Whether this proof has the exact shape required by a tree of [`TREE_HEIGHT`].
    pub fn is_well_formed(&self) -> bool {
        self.siblings.len() == PROOF_DEPTH && self.path_indices.len() == PROOF_DEPTH
    }
}

/// Convert a 256 bit integer into a key or value.
pub fn key_from_u256(value: ruint::aliases::U256) -> Key {
    value.to_be_bytes::<32>()
}

/// Interpret a key or value as a 256 bit integer.
pub fn key_to_u256(key: &Key) -> ruint::aliases::U256 {
    ruint::aliases::U256::from_be_bytes(*key)
}

/// Convert a `u64` into a key or value.
pub fn key_from_u64(value: u64) -> Key {
    key_from_u256(ruint::aliases::U256::from(value))
}
