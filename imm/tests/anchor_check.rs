mod common;

use common::{value, Test};
use imm::{IndexedMerkleMap, LedgerError, MapError};
use imm_core::{tree::key_from_u64, verify_insert, InsertWitness, RejectionReason};

// Two maps holding keys 10, 20, 30, 40 at indices 1 to 4, identical but for the value of
// `differing_key`.
fn twin_maps(differing_key: u64) -> (IndexedMerkleMap, IndexedMerkleMap) {
    let mut a = IndexedMerkleMap::default();
    let mut b = IndexedMerkleMap::default();
    for key in [10, 20, 30, 40] {
        a.insert(key_from_u64(key), value(1)).unwrap();
        let v = if key == differing_key { 2 } else { 1 };
        b.insert(key_from_u64(key), value(v)).unwrap();
    }
    (a, b)
}

// An insert of 15 into `a`, carrying the new-leaf half of the same insert into `b`. The low
// leaf is 10 at index 1; the new slot is index 5, so the paths meet at level 2.
fn stitched(a: &IndexedMerkleMap, b: &IndexedMerkleMap) -> InsertWitness {
    let mut witness = a.build_insert_witness(key_from_u64(15), value(7)).unwrap();
    let foreign = b.build_insert_witness(key_from_u64(15), value(7)).unwrap();
    assert_eq!(witness.low_leaf, foreign.low_leaf);
    witness.new_leaf_proof = foreign.new_leaf_proof;
    witness.new_root = foreign.new_root;
    witness
}

#[test]
fn proofs_from_different_trees_are_not_anchored() {
    // Key 30 sits at index 3, under the level-2 node shared with the low leaf.
    let (a, b) = twin_maps(30);
    let witness = stitched(&a, &b);
    assert_eq!(verify_insert(&witness), Err(RejectionReason::AnchorMismatch));
}

#[test]
fn difference_outside_the_anchor_is_caught() {
    // Key 40 sits at index 4, the new slot's sibling at level 0, outside the anchor subtree.
    // The anchor agrees; the intermediate trees don't.
    let (a, b) = twin_maps(40);
    let witness = stitched(&a, &b);
    assert_eq!(verify_insert(&witness), Err(RejectionReason::RootMismatch));
}

#[test]
fn stitched_witness_never_reaches_the_ledger_or_map() {
    let (_, b) = twin_maps(30);
    let mut t = Test::new();
    for key in [10, 20, 30, 40] {
        t.insert(key_from_u64(key), value(1));
    }
    let before = t.ledger.state();

    let witness = stitched(&t.map, &b);
    assert_eq!(
        t.ledger.submit(&witness.clone().into()),
        Err(LedgerError::Rejected(RejectionReason::AnchorMismatch))
    );
    assert_eq!(
        t.map.apply_insert(&witness),
        Err(MapError::Rejected(RejectionReason::AnchorMismatch))
    );
    assert_eq!(t.ledger.state(), before);
    assert_eq!(t.map.root(), before.root);
}
