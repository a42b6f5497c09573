//! Witnesses of state transitions. These types carry everything a verifier needs to check an
//! insert or update without access to the tree.

use crate::{
    proof::{MembershipProof, NonMembershipProof},
    tree::{Key, Leaf, MerkleProof, Node, Value},
};

/// A witness that a brand-new key may be appended to the tree.
///
/// Expected to be serializable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct InsertWitness {
    /// The root before insertion.
    pub old_root: Node,
    /// The root after insertion.
    pub new_root: Node,
    /// The key being inserted.
    pub new_key: Key,
    /// The value being inserted.
    pub new_value: Value,
    /// The occupied length of the tree before insertion. This is also the index the new leaf
    /// must occupy.
    pub tree_length: u32,
    /// The leaf with the greatest key below `new_key`, as it is in the old tree.
    pub low_leaf: Leaf,
    /// The path of the low leaf in the old tree.
    pub low_leaf_proof: MerkleProof,
    /// The low leaf after splicing in the new key.
    pub updated_low_leaf: Leaf,
    /// The leaf being appended.
    pub new_leaf: Leaf,
    /// The path of the new leaf's slot, taken after the low leaf was updated and before the
    /// new leaf was written.
    pub new_leaf_proof: MerkleProof,
}

/// A witness that the value of an existing key may be changed in place.
///
/// Expected to be serializable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct UpdateWitness {
    /// The root before the update.
    pub old_root: Node,
    /// The root after the update.
    pub new_root: Node,
    /// The key being updated.
    pub key: Key,
    /// The value being replaced.
    pub old_value: Value,
    /// The value being written.
    pub new_value: Value,
    /// Proof that `key` holds `old_value` under `old_root`.
    pub membership: MembershipProof,
    /// The leaf after the update.
    pub updated_leaf: Leaf,
    /// The path of the updated leaf. Identical to the membership path, since only the leaf
    /// hash changes.
    pub new_leaf_proof: MerkleProof,
}

/// Any proof or witness accepted by a verifier, dispatched by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "camelCase"))]
pub enum Witness {
    /// Append a new key.
    Insert(InsertWitness),
    /// Change the value of an existing key.
    Update(UpdateWitness),
    /// Query that a key holds a value.
    Membership(MembershipProof),
    /// Query that a key is absent.
    NonMembership(NonMembershipProof),
}

/// The kind of a [`Witness`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WitnessKind {
    /// See [`Witness::Insert`].
    Insert,
    /// See [`Witness::Update`].
    Update,
    /// See [`Witness::Membership`].
    Membership,
    /// See [`Witness::NonMembership`].
    NonMembership,
}

impl Witness {
    /// Get the kind of this witness.
    pub fn kind(&self) -> WitnessKind {
        match self {
            Witness::Insert(_) => WitnessKind::Insert,
            Witness::Update(_) => WitnessKind::Update,
            Witness::Membership(_) => WitnessKind::Membership,
            Witness::NonMembership(_) => WitnessKind::NonMembership,
        }
    }

    /// The root this witness is checked against: the old root of a transition, or the root of
    /// a query.
    pub fn anchor_root(&self) -> &Node {
        match self {
            Witness::Insert(w) => &w.old_root,
            Witness::Update(w) => &w.old_root,
            Witness::Membership(p) => &p.root,
            Witness::NonMembership(p) => &p.root,
        }
    }
}

impl From<InsertWitness> for Witness {
    fn from(w: InsertWitness) -> Self {
        Witness::Insert(w)
    }
}

impl From<UpdateWitness> for Witness {
    fn from(w: UpdateWitness) -> Self {
        Witness::Update(w)
    }
}

impl From<MembershipProof> for Witness {
    fn from(p: MembershipProof) -> Self {
        Witness::Membership(p)
    }
}

impl From<NonMembershipProof> for Witness {
    fn from(p: NonMembershipProof) -> Self {
        Witness::NonMembership(p)
    }
}
