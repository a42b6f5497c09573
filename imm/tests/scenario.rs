mod common;

use common::{value, Test};
use hex_literal::hex;
use imm::{Ledger, LedgerState, ManualClock, Receipt};
use imm_core::{
    tree::{key_from_u64, SENTINEL_KEY},
    verify_membership, verify_non_membership, Witness,
};

const GENESIS_ROOT: [u8; 32] =
    hex!("09f8e310554efa1f650480060ed0be7673bbee5a04ad7e67dba6219ccea8fd58");
const ROOT_AFTER_INSERT: [u8; 32] =
    hex!("104827e299f96cd855fdc7d41b0370dfe2668db33a80b117f55ecae84d0dda7f");
const ROOT_AFTER_UPDATE: [u8; 32] =
    hex!("c91ae6cd18d6205678cc70328b47de5377645a66e087e03eede229ae00c3874c");

#[test]
fn insert_query_update_query() {
    let mut t = Test::new();
    assert_eq!(t.map.root(), GENESIS_ROOT);
    assert_eq!(t.ledger.state().tree_length, 1);

    // Insert (44, 900) into the fresh map.
    let witness = t.map.build_insert_witness(key_from_u64(44), value(900)).unwrap();
    assert_eq!(witness.tree_length, 1);
    assert_eq!(witness.low_leaf.key, SENTINEL_KEY);
    assert_eq!(witness.new_leaf.index, 1);
    assert_eq!(witness.new_root, ROOT_AFTER_INSERT);
    t.insert(key_from_u64(44), value(900));
    assert_eq!(t.ledger.state().tree_length, 2);

    // (44, 900) is a member.
    let membership = t.map.membership_proof(&key_from_u64(44)).unwrap();
    assert!(verify_membership(&membership));
    assert_eq!(
        t.ledger.submit(&Witness::Membership(membership)),
        Ok(Receipt::Query { holds: true })
    );

    // 1000 is absent: 44 is its low leaf, and 44 is the greatest key.
    let absent = t.map.non_membership_proof(&key_from_u64(1000)).unwrap();
    assert_eq!(absent.low_leaf.key, key_from_u64(44));
    assert_eq!(absent.low_leaf.next_key, SENTINEL_KEY);
    assert!(verify_non_membership(&absent));

    // Update 44 to 950.
    t.update(key_from_u64(44), value(950));
    assert_eq!(t.ledger.root(), ROOT_AFTER_UPDATE);
    assert_eq!(t.ledger.state().tree_length, 2);

    let membership = t.map.membership_proof(&key_from_u64(44)).unwrap();
    assert_eq!(membership.leaf.value, value(950));
    assert!(verify_membership(&membership));

    let mut old = membership.clone();
    old.leaf.value = value(900);
    assert!(!verify_membership(&old));
    assert_eq!(
        t.ledger.submit(&Witness::Membership(old)),
        Ok(Receipt::Query { holds: false })
    );
}

#[test]
fn inserted_key_is_no_longer_absent() {
    let mut t = Test::new();
    for id in 0..20 {
        t.insert(common::account_key(id), value(id));
    }
    for id in 0..20 {
        let key = common::account_key(id);
        assert!(t.map.non_membership_proof(&key).is_none());

        // A non-membership proof forged from the low leaf below the key fails.
        let mut forged = t.map.non_membership_proof(&key_from_u64(1)).unwrap();
        forged.query_key = key;
        assert!(!verify_non_membership(&forged));
    }
}

#[test]
fn ledger_resumes_from_a_populated_map() {
    let mut t = Test::new();
    for id in 0..5 {
        t.insert(common::account_key(id), value(id));
    }
    assert_eq!(t.map.len(), 6);

    let resumed = Ledger::with_state(
        LedgerState {
            root: t.map.root(),
            updated_at: 5_000,
            tree_length: t.map.len(),
        },
        ManualClock::new(6_000),
    );
    assert_eq!(resumed.state().tree_length, 6);

    let witness = t
        .map
        .build_insert_witness(common::account_key(5), value(5))
        .unwrap();
    assert_eq!(witness.tree_length, 6);
    assert_eq!(
        resumed.submit(&witness.clone().into()),
        Ok(Receipt::Committed {
            old_root: t.map.root(),
            new_root: witness.new_root,
            updated_at: 6_000,
        })
    );
    assert_eq!(resumed.state().tree_length, 7);
}
