use crate::{
    error::RejectionReason,
    hasher::{compute_root, hash_leaf},
    path::path_indices_to_index,
    tree::{Leaf, MerkleProof, Node, CAPACITY},
};

/// A proof that a leaf is present in the tree committed to by `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MembershipProof {
    /// The leaf claimed to be present.
    pub leaf: Leaf,
    /// The path from the leaf to the internal root.
    pub proof: MerkleProof,
    /// The public root the leaf is claimed to be in.
    pub root: Node,
    /// The occupied length of the tree, bound into `root`.
    pub tree_length: u32,
}

/// Verify a membership proof. Returns `true` only if every check passes.
pub fn verify_membership(proof: &MembershipProof) -> bool {
    check_membership(proof).is_ok()
}

/// Verify a membership proof, returning the reason for any rejection.
pub fn check_membership(proof: &MembershipProof) -> Result<(), RejectionReason> {
    check_leaf_path(&proof.leaf, &proof.proof, proof.tree_length)?;

    let computed = compute_root(hash_leaf(&proof.leaf), &proof.proof, proof.tree_length);
    if computed != proof.root {
        return Err(RejectionReason::RootMismatch);
    }

    Ok(())
}

pub(crate) fn check_proof_shape(proof: &MerkleProof) -> Result<(), RejectionReason> {
    if proof.is_well_formed() {
        Ok(())
    } else {
        Err(RejectionReason::BadProofShape)
    }
}

/// The structural checks shared by every proof of an occupied leaf, cheapest first: shape,
/// bounds, then the path against the claimed index. No hashing is done.
pub(crate) fn check_leaf_path(
    leaf: &Leaf,
    proof: &MerkleProof,
    tree_length: u32,
) -> Result<(), RejectionReason> {
    check_proof_shape(proof)?;

    if tree_length > CAPACITY || leaf.index >= CAPACITY || leaf.index >= tree_length {
        return Err(RejectionReason::IndexOutOfBounds);
    }

    if path_indices_to_index(&proof.path_indices) != leaf.index {
        return Err(RejectionReason::PathIndexMismatch);
    }

    Ok(())
}
