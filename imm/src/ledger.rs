//! A host which holds the authoritative root and accepts witnesses against it.
//!
//! The ledger stores nothing but the current root, the length it commits to, and the time of
//! the last accepted transition. Transitions are optimistic: a witness is checked against the
//! root it claims to build on, and if another transition landed first it is refused with
//! [`LedgerError::StaleRoot`]. The caller rebuilds the witness against the new root and
//! resubmits.

use std::time::{SystemTime, UNIX_EPOCH};

use imm_core::{
    codec::encode_hex32,
    proof::{check_membership, check_non_membership},
    verify_insert, verify_update, Node, RejectionReason, Witness,
};
use parking_lot::Mutex;

use crate::error::LedgerError;

/// A source of timestamps, in milliseconds.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> u64;
}

/// Milliseconds since the unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A clock which only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock(Mutex<u64>);

impl ManualClock {
    /// Create a clock reading `now`.
    pub fn new(now: u64) -> Self {
        ManualClock(Mutex::new(now))
    }

    /// Set the reading. May go backwards.
    pub fn set(&self, now: u64) {
        *self.0.lock() = now;
    }

    /// Move the reading forward.
    pub fn advance(&self, millis: u64) {
        *self.0.lock() += millis;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        *self.0.lock()
    }
}

/// Everything the ledger persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerState {
    /// The current root.
    pub root: Node,
    /// The time of the last accepted transition, or of creation. Never decreases.
    pub updated_at: u64,
    /// The number of occupied slots committed to by `root`.
    pub tree_length: u32,
}

/// The outcome of an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receipt {
    /// An insert or update was committed.
    Committed {
        /// The root replaced.
        old_root: Node,
        /// The root adopted.
        new_root: Node,
        /// The ledger's `updated_at` after the commit.
        updated_at: u64,
    },
    /// A query was checked against the current root.
    Query {
        /// Whether the proof holds.
        holds: bool,
    },
}

/// Holds the authoritative root of an Indexed Merkle Map.
pub struct Ledger<C = SystemClock> {
    state: Mutex<LedgerState>,
    clock: C,
}

impl<C: Clock> Ledger<C> {
    /// Create a ledger holding the root of a fresh map, which holds only the sentinel leaf.
    ///
    /// The recorded `tree_length` is always 1. To host a map which already holds keys, build
    /// its [`LedgerState`] and use [`Ledger::with_state`].
    pub fn new(genesis_root: Node, clock: C) -> Self {
        let updated_at = clock.now();
        Self::with_state(
            LedgerState {
                root: genesis_root,
                updated_at,
                tree_length: 1,
            },
            clock,
        )
    }

    /// Create a ledger resuming from a persisted state.
    pub fn with_state(state: LedgerState, clock: C) -> Self {
        Ledger {
            state: Mutex::new(state),
            clock,
        }
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> LedgerState {
        *self.state.lock()
    }

    /// The current root.
    pub fn root(&self) -> Node {
        self.state.lock().root
    }

    /// The clock stamping accepted transitions.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Submit a witness.
    ///
    /// Transitions are verified against the current root and committed on success. Queries
    /// must be proven against the current root and report whether they hold; a query which
    /// fails to verify is not an error.
    pub fn submit(&self, witness: &Witness) -> Result<Receipt, LedgerError> {
        let mut state = self.state.lock();

        let presented = *witness.anchor_root();
        if presented != state.root {
            tracing::warn!(
                kind = ?witness.kind(),
                current = %encode_hex32(&state.root),
                presented = %encode_hex32(&presented),
                "stale witness"
            );
            return Err(LedgerError::StaleRoot {
                current: state.root,
                presented,
            });
        }

        let (new_root, tree_length) = match witness {
            Witness::Insert(w) => {
                let new_root = verify_insert(w).map_err(|reason| rejected(witness, reason))?;
                (new_root, w.tree_length + 1)
            }
            Witness::Update(w) => {
                let new_root = verify_update(w).map_err(|reason| rejected(witness, reason))?;
                (new_root, w.membership.tree_length)
            }
            Witness::Membership(p) => return Ok(query(witness, check_membership(p))),
            Witness::NonMembership(p) => return Ok(query(witness, check_non_membership(p))),
        };

        let old_root = state.root;
        state.root = new_root;
        state.tree_length = tree_length;
        state.updated_at = state.updated_at.max(self.clock.now());

        tracing::debug!(
            kind = ?witness.kind(),
            old_root = %encode_hex32(&old_root),
            new_root = %encode_hex32(&new_root),
            tree_length,
            "witness accepted"
        );

        Ok(Receipt::Committed {
            old_root,
            new_root,
            updated_at: state.updated_at,
        })
    }
}

fn rejected(witness: &Witness, reason: RejectionReason) -> LedgerError {
    tracing::warn!(kind = ?witness.kind(), %reason, "witness rejected");
    LedgerError::Rejected(reason)
}

fn query(witness: &Witness, outcome: Result<(), RejectionReason>) -> Receipt {
    match outcome {
        Ok(()) => tracing::debug!(kind = ?witness.kind(), "query holds"),
        Err(reason) => tracing::debug!(kind = ?witness.kind(), %reason, "query does not hold"),
    }
    Receipt::Query {
        holds: outcome.is_ok(),
    }
}
