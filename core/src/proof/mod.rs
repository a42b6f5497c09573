//! Membership and non-membership proofs and their verification.
//!
//! The indexed merkle tree is an authenticated data structure: a single path from a leaf to
//! the root is enough to convince a verifier that the leaf is present in the tree committed to
//! by the root. Because each leaf also names its successor, a single path to the right leaf
//! is also enough to show that a key is absent.
//!
//! Using the types and functions exposed from this module, you can verify that a key has a
//! specific value ([`MembershipProof`]) or no value at all ([`NonMembershipProof`]).

pub use membership::{check_membership, verify_membership, MembershipProof};
pub use non_membership::{
    check_gap, check_non_membership, verify_non_membership, NonMembershipProof,
};

pub(crate) use membership::{check_leaf_path, check_proof_shape};

mod membership;
mod non_membership;
