//! Verification of insert witnesses.
//!
//! An insert touches two leaves: the low leaf, whose `next_key` is rewritten to splice the
//! new key into the sorted list, and the new leaf, appended at the first free slot. The
//! witness carries one proof for each, taken in sequence: the low-leaf proof against the old
//! tree, and the new-leaf proof against the tree in which the low leaf has already been
//! rewritten but the new slot is still empty.
//!
//! The two proofs share every node above the level where their paths diverge. If the
//! verifier checked each proof on its own, a prover could pair a low-leaf proof from the real
//! tree with a new-leaf proof from a tree of its own making and walk away with a forged root.
//! The anchor check closes this: the new-leaf proof's sibling at the divergence level must be
//! exactly the node the rewritten low leaf hashes up to, and the two proofs must agree on the
//! whole intermediate tree.

use crate::{
    error::RejectionReason,
    hasher::{compute_internal_root, compute_root, hash_leaf},
    path::{find_lca_level, hash_up_to_level, path_indices_to_index},
    proof::{check_gap, check_non_membership, check_proof_shape, NonMembershipProof},
    tree::{Leaf, Node, CAPACITY, EMPTY_LEAF},
    witness::InsertWitness,
};

/// Verify an insert witness, returning the new root to be adopted on success.
///
/// Checks are ordered cheapest first, and every one of them runs: none relies on an earlier
/// one to have caught bad input.
pub fn verify_insert(w: &InsertWitness) -> Result<Node, RejectionReason> {
    // Proof shape.
    check_proof_shape(&w.low_leaf_proof)?;
    check_proof_shape(&w.new_leaf_proof)?;

    // Capacity.
    if w.tree_length >= CAPACITY {
        return Err(RejectionReason::CapacityExceeded);
    }

    // Index bounds.
    if w.low_leaf.index >= w.tree_length || w.new_leaf.index >= CAPACITY {
        return Err(RejectionReason::IndexOutOfBounds);
    }

    // Append-only.
    if w.new_leaf.index != w.tree_length {
        return Err(RejectionReason::NotAppendOnly);
    }

    // Path consistency.
    if path_indices_to_index(&w.low_leaf_proof.path_indices) != w.low_leaf.index
        || path_indices_to_index(&w.new_leaf_proof.path_indices) != w.new_leaf.index
    {
        return Err(RejectionReason::PathIndexMismatch);
    }

    // The key is absent from the old tree.
    check_non_membership(&NonMembershipProof {
        low_leaf: w.low_leaf,
        proof: w.low_leaf_proof.clone(),
        root: w.old_root,
        tree_length: w.tree_length,
        query_key: w.new_key,
    })?;

    // Key ordering.
    if check_gap(&w.low_leaf, &w.new_key).is_err() {
        return Err(RejectionReason::OrderingViolation);
    }

    // Leaf structure.
    let expected_low_leaf = Leaf {
        next_key: w.new_key,
        ..w.low_leaf
    };
    let expected_new_leaf = Leaf {
        key: w.new_key,
        value: w.new_value,
        next_key: w.low_leaf.next_key,
        index: w.tree_length,
    };
    if w.updated_low_leaf != expected_low_leaf || w.new_leaf != expected_new_leaf {
        return Err(RejectionReason::LeafMismatch);
    }

    // New root.
    let new_length = w.tree_length + 1;
    if compute_root(hash_leaf(&w.new_leaf), &w.new_leaf_proof, new_length) != w.new_root {
        return Err(RejectionReason::RootMismatch);
    }

    // Anchor.
    let lca_level = find_lca_level(
        &w.low_leaf_proof.path_indices,
        &w.new_leaf_proof.path_indices,
    )
    .map_err(|_| RejectionReason::PathIndexMismatch)?;

    let updated_low_hash = hash_leaf(&w.updated_low_leaf);
    let anchor = hash_up_to_level(
        updated_low_hash,
        &w.low_leaf_proof.siblings,
        &w.low_leaf_proof.path_indices,
        lca_level,
    );
    if anchor != w.new_leaf_proof.siblings[lca_level as usize] {
        return Err(RejectionReason::AnchorMismatch);
    }

    // Both proofs describe the same intermediate tree.
    let intermediate_via_low = compute_internal_root(updated_low_hash, &w.low_leaf_proof);
    let intermediate_via_new = compute_internal_root(EMPTY_LEAF, &w.new_leaf_proof);
    if intermediate_via_low != intermediate_via_new {
        return Err(RejectionReason::RootMismatch);
    }

    Ok(w.new_root)
}
