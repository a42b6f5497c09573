mod common;

use common::{account_key, value, Test};
use imm::{LedgerError, Receipt};
use imm_core::{RejectionReason, Witness};

#[test]
fn test_prev_root_commits() {
    let mut t = Test::new();
    let first = t.map.build_insert_witness(account_key(1), value(1)).unwrap();
    let second = t.map.build_insert_witness(account_key(2), value(2)).unwrap();

    t.ledger.submit(&first.clone().into()).unwrap();
    t.map.apply_insert(&first).unwrap();

    let genesis = second.old_root;
    assert_eq!(
        t.ledger.submit(&second.into()),
        Err(LedgerError::StaleRoot {
            current: t.map.root(),
            presented: genesis,
        })
    );

    // Rebuilt against the new root, it goes through.
    t.insert(account_key(2), value(2));
    assert_eq!(t.ledger.state().tree_length, 3);
}

#[test]
fn test_prev_root_update_after_insert() {
    let mut t = Test::new();
    t.insert(account_key(1), value(1));
    let update = t.map.build_update_witness(account_key(1), value(2)).unwrap();

    t.insert(account_key(2), value(2));
    t.ledger.submit(&update.into()).unwrap_err();
}

#[test]
fn test_prev_root_queries() {
    let mut t = Test::new();
    t.insert(account_key(1), value(1));
    let membership = t.map.membership_proof(&account_key(1)).unwrap();
    let absent = t.map.non_membership_proof(&account_key(2)).unwrap();

    assert_eq!(
        t.ledger.submit(&membership.clone().into()),
        Ok(Receipt::Query { holds: true })
    );
    assert_eq!(
        t.ledger.submit(&absent.clone().into()),
        Ok(Receipt::Query { holds: true })
    );

    t.update(account_key(1), value(5));
    assert!(matches!(
        t.ledger.submit(&membership.into()),
        Err(LedgerError::StaleRoot { .. })
    ));
    assert!(matches!(
        t.ledger.submit(&absent.into()),
        Err(LedgerError::StaleRoot { .. })
    ));
}

#[test]
fn rejection_leaves_state_untouched() {
    let mut t = Test::new();
    t.insert(account_key(1), value(1));
    let before = t.ledger.state();

    let mut witness = t.map.build_insert_witness(account_key(2), value(2)).unwrap();
    witness.new_leaf.index += 1;
    assert_eq!(
        t.ledger.submit(&Witness::Insert(witness)),
        Err(LedgerError::Rejected(RejectionReason::NotAppendOnly))
    );

    let mut witness = t.map.build_update_witness(account_key(1), value(3)).unwrap();
    witness.old_value = value(9);
    assert_eq!(
        t.ledger.submit(&Witness::Update(witness)),
        Err(LedgerError::Rejected(RejectionReason::NotFound))
    );

    t.ledger.clock().advance(10);
    assert_eq!(t.ledger.state(), before);
}

#[test]
fn updated_at_never_decreases() {
    let mut t = Test::new();
    assert_eq!(t.ledger.state().updated_at, 1_000);

    t.ledger.clock().advance(500);
    t.insert(account_key(1), value(1));
    assert_eq!(t.ledger.state().updated_at, 1_500);

    t.ledger.clock().set(200);
    t.insert(account_key(2), value(2));
    assert_eq!(t.ledger.state().updated_at, 1_500);

    t.ledger.clock().set(2_000);
    t.update(account_key(2), value(3));
    assert_eq!(t.ledger.state().updated_at, 2_000);
}
