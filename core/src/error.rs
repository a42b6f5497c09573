//! Reasons a witness or proof is rejected.

use crate::codec::MalformedHex;
use core::fmt;

/// Why a verifier refused a proof or witness.
///
/// These are plain rejection reasons, returned across the trust boundary as values. No
/// verifier panics on attacker-controlled input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RejectionReason {
    /// A 32-byte field was not 64 lowercase hex characters.
    MalformedHex,
    /// A proof did not have exactly 31 siblings and 31 path indices.
    BadProofShape,
    /// An index or length was negative, overflowing, or past the occupied tree.
    IndexOutOfBounds,
    /// The path of a proof did not lead to the leaf's claimed index.
    PathIndexMismatch,
    /// The tree has no free slot left.
    CapacityExceeded,
    /// An insert did not target the next free slot.
    NotAppendOnly,
    /// The keys did not respect the sorted order of the map.
    OrderingViolation,
    /// An insert targeted a key that is already present.
    AlreadyExists,
    /// An update targeted a key or value that is not present.
    NotFound,
    /// A rewritten leaf changed a field it is not allowed to change.
    LeafMismatch,
    /// A recomputed root disagreed with the claimed root.
    RootMismatch,
    /// The low-leaf and new-leaf proofs of an insert were not drawn from the same tree.
    AnchorMismatch,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedHex => write!(f, "malformed hex field"),
            Self::BadProofShape => write!(f, "proof does not have 31 levels"),
            Self::IndexOutOfBounds => write!(f, "index out of bounds"),
            Self::PathIndexMismatch => write!(f, "proof path does not match leaf index"),
            Self::CapacityExceeded => write!(f, "tree is full"),
            Self::NotAppendOnly => write!(f, "new leaf is not appended at the tree length"),
            Self::OrderingViolation => write!(f, "key ordering violated"),
            Self::AlreadyExists => write!(f, "key already exists"),
            Self::NotFound => write!(f, "key not found"),
            Self::LeafMismatch => write!(f, "rewritten leaf does not match"),
            Self::RootMismatch => write!(f, "root mismatch"),
            Self::AnchorMismatch => write!(f, "proofs are not anchored in the same tree"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RejectionReason {}

impl From<MalformedHex> for RejectionReason {
    fn from(_: MalformedHex) -> Self {
        RejectionReason::MalformedHex
    }
}
