//! A reference maintainer and ledger host for the Indexed Merkle Map.
//!
//! [`IndexedMerkleMap`] keeps the full tree in memory and builds the proofs and witnesses
//! verified by [`imm_core`]. [`Ledger`] plays the other side: it holds nothing but the current
//! root and accepts or refuses the witnesses submitted to it.
//!
//! ```
//! use imm::{IndexedMerkleMap, Ledger, Receipt, SystemClock};
//! use imm_core::{tree::key_from_u64, Witness};
//!
//! let mut map = IndexedMerkleMap::default();
//! let ledger = Ledger::new(map.root(), SystemClock);
//!
//! let witness = map.build_insert_witness(key_from_u64(44), key_from_u64(900)).unwrap();
//! let receipt = ledger.submit(&Witness::Insert(witness.clone())).unwrap();
//! assert!(matches!(receipt, Receipt::Committed { .. }));
//!
//! map.apply_insert(&witness).unwrap();
//! assert_eq!(map.root(), ledger.root());
//! ```

#![warn(missing_docs)]

mod error;
mod ledger;
mod map;
mod options;

pub use error::{LedgerError, MapError};
pub use ledger::{Clock, Ledger, LedgerState, ManualClock, Receipt, SystemClock};
pub use map::IndexedMerkleMap;
pub use options::Options;
