//! Verification of update witnesses.
//!
//! An update rewrites the value of one existing leaf in place. Its key, successor and index
//! stay put, so the path to the leaf and every sibling along it are unchanged: the new root is
//! the old path folded over the new leaf hash.

use crate::{
    error::RejectionReason,
    hasher::{compute_root, hash_leaf},
    proof::{check_leaf_path, check_membership, check_proof_shape},
    tree::{Leaf, Node},
    witness::UpdateWitness,
};

/// Verify an update witness, returning the new root to be adopted on success.
///
/// Updating a key to the value it already holds is accepted here. Refusing such no-op
/// updates is left to whoever builds the witness.
pub fn verify_update(w: &UpdateWitness) -> Result<Node, RejectionReason> {
    let membership = &w.membership;
    let tree_length = membership.tree_length;

    // Proof shape and paths, before any hashing.
    check_proof_shape(&membership.proof)?;
    check_proof_shape(&w.new_leaf_proof)?;
    check_leaf_path(&membership.leaf, &membership.proof, tree_length)?;
    check_leaf_path(&w.updated_leaf, &w.new_leaf_proof, tree_length)?;

    // The key holds the old value under the old root.
    if membership.root != w.old_root {
        return Err(RejectionReason::RootMismatch);
    }
    if membership.leaf.key != w.key || membership.leaf.value != w.old_value {
        return Err(RejectionReason::NotFound);
    }
    check_membership(membership)?;

    // Only the value may change.
    let expected = Leaf {
        value: w.new_value,
        ..membership.leaf
    };
    if w.updated_leaf != expected {
        return Err(RejectionReason::LeafMismatch);
    }

    // The new root, folded over both the supplied path and the membership path. Both must
    // agree, which ties the new root to the siblings proven against the old root.
    let updated_hash = hash_leaf(&w.updated_leaf);
    if compute_root(updated_hash, &w.new_leaf_proof, tree_length) != w.new_root
        || compute_root(updated_hash, &membership.proof, tree_length) != w.new_root
    {
        return Err(RejectionReason::RootMismatch);
    }

    Ok(w.new_root)
}
