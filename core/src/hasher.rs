//! Hash primitives of the tree.
//!
//! The tree is hashed with SHA-256 throughout. Leaves hash the concatenation of their key,
//! value and next key; internal nodes hash the concatenation of their two children. The
//! public root additionally commits to the occupied length of the tree, so a proof can't be
//! replayed against a tree with the same contents but a different length.

use crate::tree::{Leaf, MerkleProof, Node, EMPTY_LEAF, PROOF_DEPTH};
use sha2::{Digest, Sha256};

/// A simple trait for representing binary hash functions.
pub trait BinaryHash {
    /// Given a bit-string, produce a 32-byte hash.
    fn hash(input: &[u8]) -> [u8; 32];

    /// An optional specialization of `hash` where there are two 32-byte inputs, left and right.
    fn hash2_32_concat(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
        let mut buf = [0u8; 64];
        buf[0..32].copy_from_slice(left);
        buf[32..64].copy_from_slice(right);
        Self::hash(&buf)
    }
}

/// A [`BinaryHash`] implementation for Sha2.
pub struct Sha2BinaryHasher;

impl BinaryHash for Sha2BinaryHasher {
    fn hash(value: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(value);
        hasher.finalize().into()
    }

    fn hash2_32_concat(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(left);
        hasher.update(right);
        hasher.finalize().into()
    }
}

/// The hash function of the tree. Fixed at compile time.
type H = Sha2BinaryHasher;

/// Hash a leaf: `SHA256(key || value || next_key)`. The index is not hashed.
pub fn hash_leaf(leaf: &Leaf) -> Node {
    let mut hasher = Sha256::new();
    hasher.update(leaf.key);
    hasher.update(leaf.value);
    hasher.update(leaf.next_key);
    hasher.finalize().into()
}

/// Hash an internal node from its two children.
pub fn hash_pair(left: &Node, right: &Node) -> Node {
    H::hash2_32_concat(left, right)
}

/// Hash a node together with its sibling at some level, according to which side the node is
/// on.
pub(crate) fn hash_with_sibling(node: &Node, sibling: &Node, is_right: bool) -> Node {
    if is_right {
        hash_pair(sibling, node)
    } else {
        hash_pair(node, sibling)
    }
}

/// Bind an internal root to the occupied length of the tree.
///
/// `SHA256(internal_root || length as 8 big-endian bytes)`.
pub fn combine_root_with_length(internal_root: &Node, length: u32) -> Node {
    let mut buf = [0u8; 40];
    buf[0..32].copy_from_slice(internal_root);
    buf[32..40].copy_from_slice(&(length as u64).to_be_bytes());
    H::hash(&buf)
}

/// Fold a leaf hash up through every level of the proof, yielding the internal root.
///
/// Callers are expected to have checked the shape of the proof; extra or missing entries are
/// handled by zipping the two vectors.
pub fn compute_internal_root(leaf_hash: Node, proof: &MerkleProof) -> Node {
    proof
        .siblings
        .iter()
        .zip(&proof.path_indices)
        .fold(leaf_hash, |node, (sibling, &is_right)| {
            hash_with_sibling(&node, sibling, is_right)
        })
}

/// Compute the public root from a leaf hash, its proof and the occupied tree length.
pub fn compute_root(leaf_hash: Node, proof: &MerkleProof, length: u32) -> Node {
    combine_root_with_length(&compute_internal_root(leaf_hash, proof), length)
}

/// The hashes of empty subtrees, indexed by level. Level 0 is an empty leaf slot; the last
/// entry is the internal root of a tree with no occupied slots.
pub fn empty_subtree_hashes() -> [Node; PROOF_DEPTH + 1] {
    let mut hashes = [EMPTY_LEAF; PROOF_DEPTH + 1];
    for level in 1..=PROOF_DEPTH {
        hashes[level] = hash_pair(&hashes[level - 1], &hashes[level - 1]);
    }
    hashes
}
