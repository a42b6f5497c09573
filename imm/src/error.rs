use imm_core::{Node, RejectionReason};
use std::fmt;

/// Errors produced by [`crate::IndexedMerkleMap`] when building or applying witnesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// The key being inserted is already present.
    KeyAlreadyExists,
    /// The key being updated is not present.
    KeyDoesNotExist,
    /// Every slot of the tree is occupied.
    TreeFull,
    /// The all-zero key is reserved for the sentinel leaf.
    ZeroKey,
    /// The update would write the value the key already holds.
    NoOpUpdate,
    /// The witness was built against a root other than the current one.
    StaleWitness,
    /// The witness was refused by the verifier.
    Rejected(RejectionReason),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::KeyAlreadyExists => f.write_str("key already exists"),
            MapError::KeyDoesNotExist => f.write_str("key does not exist"),
            MapError::TreeFull => f.write_str("tree is full"),
            MapError::ZeroKey => f.write_str("the zero key is reserved"),
            MapError::NoOpUpdate => f.write_str("update does not change the value"),
            MapError::StaleWitness => f.write_str("witness built against a stale root"),
            MapError::Rejected(reason) => write!(f, "witness rejected: {}", reason),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::Rejected(reason) => Some(reason),
            _ => None,
        }
    }
}

impl From<RejectionReason> for MapError {
    fn from(reason: RejectionReason) -> Self {
        MapError::Rejected(reason)
    }
}

/// Errors produced by [`crate::Ledger::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    /// The witness was checked against a root other than the current one. The caller should
    /// rebuild it against the current root and resubmit.
    StaleRoot {
        /// The root held by the ledger.
        current: Node,
        /// The root the witness was checked against.
        presented: Node,
    },
    /// The witness was refused by the verifier.
    Rejected(RejectionReason),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::StaleRoot { .. } => f.write_str("witness does not build on the current root"),
            LedgerError::Rejected(reason) => write!(f, "witness rejected: {}", reason),
        }
    }
}

impl std::error::Error for LedgerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LedgerError::Rejected(reason) => Some(reason),
            _ => None,
        }
    }
}

impl From<RejectionReason> for LedgerError {
    fn from(reason: RejectionReason) -> Self {
        LedgerError::Rejected(reason)
    }
}
