//! Core types and witness verification for the Indexed Merkle Map.
//!
//! The Indexed Merkle Map is a sorted key-value map authenticated by a fixed-height binary
//! Merkle tree. Every leaf carries the key of its successor, threading a sorted linked list
//! through the tree, which lets absence of a key be proven by exhibiting the gap it would
//! fall into.
//!
//! This crate defines the schema and the verification routines for membership,
//! non-membership, update and insert witnesses. None of them require the full tree: each
//! check runs in time proportional to the tree height.
//!
//! The core types and verification routines of this crate do not require the standard
//! library, but do require Rust's alloc crate.

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

extern crate alloc;

pub mod codec;
pub mod error;
pub mod hasher;
pub mod insert;
pub mod path;
pub mod proof;
pub mod tree;
pub mod update;
pub mod wire;
pub mod witness;

#[cfg(test)]
mod test_utils;

pub use error::RejectionReason;
pub use insert::verify_insert;
pub use proof::{verify_membership, verify_non_membership, MembershipProof, NonMembershipProof};
pub use tree::{Key, Leaf, MerkleProof, Node, Value};
pub use update::verify_update;
pub use witness::{InsertWitness, UpdateWitness, Witness, WitnessKind};
