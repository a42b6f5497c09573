//! The external form of proofs and witnesses.
//!
//! On the wire every 32-byte field is a string of 64 lowercase hex characters, and indices
//! and lengths are signed 64-bit integers. Nothing arriving in this form is trusted: each
//! entry point first canonicalizes every field into the typed form of [`crate::tree`], and
//! only then runs the verifier. A malformed field is therefore always reported as such, and
//! never as a failed hash check.

use crate::{
    codec::{encode_hex32, parse_hex32},
    error::RejectionReason,
    proof, tree, witness, Node,
};
use alloc::{string::String, vec::Vec};

/// A leaf in wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WireLeaf {
    pub key: String,
    pub value: String,
    pub next_key: String,
    pub index: i64,
}

/// A merkle path in wire form: two parallel arrays, ascending by level.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WireMerkleProof {
    pub siblings: Vec<String>,
    pub path_indices: Vec<bool>,
}

/// A membership proof in wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WireMembershipProof {
    pub leaf: WireLeaf,
    pub proof: WireMerkleProof,
    pub root: String,
    pub tree_length: i64,
}

/// A non-membership proof in wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WireNonMembershipProof {
    pub low_leaf: WireLeaf,
    pub proof: WireMerkleProof,
    pub root: String,
    pub tree_length: i64,
    pub query_key: String,
}

/// An insert witness in wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WireInsertWitness {
    pub old_root: String,
    pub new_root: String,
    pub new_key: String,
    pub new_value: String,
    pub tree_length: i64,
    pub low_leaf: WireLeaf,
    pub low_leaf_proof: WireMerkleProof,
    pub updated_low_leaf: WireLeaf,
    pub new_leaf: WireLeaf,
    pub new_leaf_proof: WireMerkleProof,
}

/// An update witness in wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WireUpdateWitness {
    pub old_root: String,
    pub new_root: String,
    pub key: String,
    pub old_value: String,
    pub new_value: String,
    pub membership: WireMembershipProof,
    pub updated_leaf: WireLeaf,
    pub new_leaf_proof: WireMerkleProof,
}

/// Any proof or witness in wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "camelCase"))]
pub enum WireWitness {
    Insert(WireInsertWitness),
    Update(WireUpdateWitness),
    Membership(WireMembershipProof),
    NonMembership(WireNonMembershipProof),
}

/// Canonicalize and verify an insert witness.
pub fn verify_insert(w: &WireInsertWitness) -> Result<Node, RejectionReason> {
    crate::insert::verify_insert(&w.try_into()?)
}

/// Canonicalize and verify an update witness.
pub fn verify_update(w: &WireUpdateWitness) -> Result<Node, RejectionReason> {
    crate::update::verify_update(&w.try_into()?)
}

/// Canonicalize and verify a membership proof.
pub fn verify_membership(p: &WireMembershipProof) -> bool {
    check_membership(p).is_ok()
}

/// Canonicalize and verify a membership proof, returning the reason for any rejection.
pub fn check_membership(p: &WireMembershipProof) -> Result<(), RejectionReason> {
    proof::check_membership(&p.try_into()?)
}

/// Canonicalize and verify a non-membership proof.
pub fn verify_non_membership(p: &WireNonMembershipProof) -> bool {
    check_non_membership(p).is_ok()
}

/// Canonicalize and verify a non-membership proof, returning the reason for any rejection.
pub fn check_non_membership(p: &WireNonMembershipProof) -> Result<(), RejectionReason> {
    proof::check_non_membership(&p.try_into()?)
}

fn index(value: i64) -> Result<u32, RejectionReason> {
    u32::try_from(value).map_err(|_| RejectionReason::IndexOutOfBounds)
}

fn hex32(s: &str) -> Result<[u8; 32], RejectionReason> {
    Ok(parse_hex32(s)?)
}

fn siblings(proof: &WireMerkleProof) -> Result<Vec<Node>, RejectionReason> {
    proof.siblings.iter().map(|s| hex32(s)).collect()
}

fn check_shape(proof: &WireMerkleProof) -> Result<(), RejectionReason> {
    if proof.siblings.len() != proof.path_indices.len() {
        return Err(RejectionReason::BadProofShape);
    }
    Ok(())
}

fn assemble(siblings: Vec<Node>, proof: &WireMerkleProof) -> tree::MerkleProof {
    tree::MerkleProof {
        siblings,
        path_indices: proof.path_indices.clone(),
    }
}

// Conversions run in three passes over the whole input: hex fields, then indices, then array
// lengths. The first failing pass decides the reason.

/// The 32-byte fields of a leaf, decoded ahead of its index.
struct LeafBytes {
    key: [u8; 32],
    value: [u8; 32],
    next_key: [u8; 32],
}

impl LeafBytes {
    fn decode(leaf: &WireLeaf) -> Result<Self, RejectionReason> {
        Ok(LeafBytes {
            key: hex32(&leaf.key)?,
            value: hex32(&leaf.value)?,
            next_key: hex32(&leaf.next_key)?,
        })
    }

    fn at(self, index: u32) -> tree::Leaf {
        tree::Leaf {
            key: self.key,
            value: self.value,
            next_key: self.next_key,
            index,
        }
    }
}

/// The 32-byte fields of a membership proof, decoded ahead of its indices.
struct MembershipBytes {
    leaf: LeafBytes,
    siblings: Vec<Node>,
    root: Node,
}

impl MembershipBytes {
    fn decode(p: &WireMembershipProof) -> Result<Self, RejectionReason> {
        Ok(MembershipBytes {
            leaf: LeafBytes::decode(&p.leaf)?,
            siblings: siblings(&p.proof)?,
            root: hex32(&p.root)?,
        })
    }

    fn indices(p: &WireMembershipProof) -> Result<(u32, u32), RejectionReason> {
        Ok((index(p.leaf.index)?, index(p.tree_length)?))
    }

    fn assemble(
        self,
        p: &WireMembershipProof,
        (leaf_index, tree_length): (u32, u32),
    ) -> proof::MembershipProof {
        proof::MembershipProof {
            leaf: self.leaf.at(leaf_index),
            proof: assemble(self.siblings, &p.proof),
            root: self.root,
            tree_length,
        }
    }
}

impl TryFrom<&WireLeaf> for tree::Leaf {
    type Error = RejectionReason;

    fn try_from(leaf: &WireLeaf) -> Result<Self, Self::Error> {
        let bytes = LeafBytes::decode(leaf)?;
        Ok(bytes.at(index(leaf.index)?))
    }
}

impl TryFrom<&WireMerkleProof> for tree::MerkleProof {
    type Error = RejectionReason;

    fn try_from(proof: &WireMerkleProof) -> Result<Self, Self::Error> {
        let siblings = siblings(proof)?;
        check_shape(proof)?;
        Ok(assemble(siblings, proof))
    }
}

impl TryFrom<&WireMembershipProof> for proof::MembershipProof {
    type Error = RejectionReason;

    fn try_from(p: &WireMembershipProof) -> Result<Self, Self::Error> {
        let bytes = MembershipBytes::decode(p)?;
        let indices = MembershipBytes::indices(p)?;
        check_shape(&p.proof)?;
        Ok(bytes.assemble(p, indices))
    }
}

impl TryFrom<&WireNonMembershipProof> for proof::NonMembershipProof {
    type Error = RejectionReason;

    fn try_from(p: &WireNonMembershipProof) -> Result<Self, Self::Error> {
        let low_leaf = LeafBytes::decode(&p.low_leaf)?;
        let low_siblings = siblings(&p.proof)?;
        let root = hex32(&p.root)?;
        let query_key = hex32(&p.query_key)?;

        let low_index = index(p.low_leaf.index)?;
        let tree_length = index(p.tree_length)?;

        check_shape(&p.proof)?;

        Ok(proof::NonMembershipProof {
            low_leaf: low_leaf.at(low_index),
            proof: assemble(low_siblings, &p.proof),
            root,
            tree_length,
            query_key,
        })
    }
}

impl TryFrom<&WireInsertWitness> for witness::InsertWitness {
    type Error = RejectionReason;

    fn try_from(w: &WireInsertWitness) -> Result<Self, Self::Error> {
        let old_root = hex32(&w.old_root)?;
        let new_root = hex32(&w.new_root)?;
        let new_key = hex32(&w.new_key)?;
        let new_value = hex32(&w.new_value)?;
        let low_leaf = LeafBytes::decode(&w.low_leaf)?;
        let low_siblings = siblings(&w.low_leaf_proof)?;
        let updated_low_leaf = LeafBytes::decode(&w.updated_low_leaf)?;
        let new_leaf = LeafBytes::decode(&w.new_leaf)?;
        let new_siblings = siblings(&w.new_leaf_proof)?;

        let tree_length = index(w.tree_length)?;
        let low_index = index(w.low_leaf.index)?;
        let updated_low_index = index(w.updated_low_leaf.index)?;
        let new_index = index(w.new_leaf.index)?;

        check_shape(&w.low_leaf_proof)?;
        check_shape(&w.new_leaf_proof)?;

        Ok(witness::InsertWitness {
            old_root,
            new_root,
            new_key,
            new_value,
            tree_length,
            low_leaf: low_leaf.at(low_index),
            low_leaf_proof: assemble(low_siblings, &w.low_leaf_proof),
            updated_low_leaf: updated_low_leaf.at(updated_low_index),
            new_leaf: new_leaf.at(new_index),
            new_leaf_proof: assemble(new_siblings, &w.new_leaf_proof),
        })
    }
}

impl TryFrom<&WireUpdateWitness> for witness::UpdateWitness {
    type Error = RejectionReason;

    fn try_from(w: &WireUpdateWitness) -> Result<Self, Self::Error> {
        let old_root = hex32(&w.old_root)?;
        let new_root = hex32(&w.new_root)?;
        let key = hex32(&w.key)?;
        let old_value = hex32(&w.old_value)?;
        let new_value = hex32(&w.new_value)?;
        let membership = MembershipBytes::decode(&w.membership)?;
        let updated_leaf = LeafBytes::decode(&w.updated_leaf)?;
        let new_siblings = siblings(&w.new_leaf_proof)?;

        let membership_indices = MembershipBytes::indices(&w.membership)?;
        let updated_index = index(w.updated_leaf.index)?;

        check_shape(&w.membership.proof)?;
        check_shape(&w.new_leaf_proof)?;

        Ok(witness::UpdateWitness {
            old_root,
            new_root,
            key,
            old_value,
            new_value,
            membership: membership.assemble(&w.membership, membership_indices),
            updated_leaf: updated_leaf.at(updated_index),
            new_leaf_proof: assemble(new_siblings, &w.new_leaf_proof),
        })
    }
}

impl TryFrom<&WireWitness> for witness::Witness {
    type Error = RejectionReason;

    fn try_from(w: &WireWitness) -> Result<Self, Self::Error> {
        Ok(match w {
            WireWitness::Insert(w) => witness::Witness::Insert(w.try_into()?),
            WireWitness::Update(w) => witness::Witness::Update(w.try_into()?),
            WireWitness::Membership(p) => witness::Witness::Membership(p.try_into()?),
            WireWitness::NonMembership(p) => witness::Witness::NonMembership(p.try_into()?),
        })
    }
}

impl From<&tree::Leaf> for WireLeaf {
    fn from(leaf: &tree::Leaf) -> Self {
        WireLeaf {
            key: encode_hex32(&leaf.key),
            value: encode_hex32(&leaf.value),
            next_key: encode_hex32(&leaf.next_key),
            index: leaf.index.into(),
        }
    }
}

impl From<&tree::MerkleProof> for WireMerkleProof {
    fn from(proof: &tree::MerkleProof) -> Self {
        WireMerkleProof {
            siblings: proof.siblings.iter().map(encode_hex32).collect(),
            path_indices: proof.path_indices.clone(),
        }
    }
}

impl From<&proof::MembershipProof> for WireMembershipProof {
    fn from(p: &proof::MembershipProof) -> Self {
        WireMembershipProof {
            leaf: (&p.leaf).into(),
            proof: (&p.proof).into(),
            root: encode_hex32(&p.root),
            tree_length: p.tree_length.into(),
        }
    }
}

impl From<&proof::NonMembershipProof> for WireNonMembershipProof {
    fn from(p: &proof::NonMembershipProof) -> Self {
        WireNonMembershipProof {
            low_leaf: (&p.low_leaf).into(),
            proof: (&p.proof).into(),
            root: encode_hex32(&p.root),
            tree_length: p.tree_length.into(),
            query_key: encode_hex32(&p.query_key),
        }
    }
}

impl From<&witness::InsertWitness> for WireInsertWitness {
    fn from(w: &witness::InsertWitness) -> Self {
        WireInsertWitness {
            old_root: encode_hex32(&w.old_root),
            new_root: encode_hex32(&w.new_root),
            new_key: encode_hex32(&w.new_key),
            new_value: encode_hex32(&w.new_value),
            tree_length: w.tree_length.into(),
            low_leaf: (&w.low_leaf).into(),
            low_leaf_proof: (&w.low_leaf_proof).into(),
            updated_low_leaf: (&w.updated_low_leaf).into(),
            new_leaf: (&w.new_leaf).into(),
            new_leaf_proof: (&w.new_leaf_proof).into(),
        }
    }
}

impl From<&witness::UpdateWitness> for WireUpdateWitness {
    fn from(w: &witness::UpdateWitness) -> Self {
        WireUpdateWitness {
            old_root: encode_hex32(&w.old_root),
            new_root: encode_hex32(&w.new_root),
            key: encode_hex32(&w.key),
            old_value: encode_hex32(&w.old_value),
            new_value: encode_hex32(&w.new_value),
            membership: (&w.membership).into(),
            updated_leaf: (&w.updated_leaf).into(),
            new_leaf_proof: (&w.new_leaf_proof).into(),
        }
    }
}

impl From<&witness::Witness> for WireWitness {
    fn from(w: &witness::Witness) -> Self {
        match w {
            witness::Witness::Insert(w) => WireWitness::Insert(w.into()),
            witness::Witness::Update(w) => WireWitness::Update(w.into()),
            witness::Witness::Membership(p) => WireWitness::Membership(p.into()),
            witness::Witness::NonMembership(p) => WireWitness::NonMembership(p.into()),
        }
    }
}
