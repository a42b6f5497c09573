use crate::{
    error::RejectionReason,
    hasher::{compute_root, hash_leaf},
    proof::membership::check_leaf_path,
    tree::{Key, Leaf, MerkleProof, Node},
};

/// A proof that `query_key` has no value in the tree committed to by `root`.
///
/// The proof exhibits the low leaf: the leaf holding the greatest key below `query_key`.
/// Since the low leaf names its successor, showing that `query_key` falls strictly between
/// the two shows that nothing is stored under it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct NonMembershipProof {
    /// The leaf whose gap contains `query_key`.
    pub low_leaf: Leaf,
    /// The path from the low leaf to the internal root.
    pub proof: MerkleProof,
    /// The public root the key is claimed to be absent from.
    pub root: Node,
    /// The occupied length of the tree, bound into `root`.
    pub tree_length: u32,
    /// The key claimed to be absent.
    pub query_key: Key,
}

/// Verify a non-membership proof. Returns `true` only if every check passes.
pub fn verify_non_membership(proof: &NonMembershipProof) -> bool {
    check_non_membership(proof).is_ok()
}

/// Verify a non-membership proof, returning the reason for any rejection.
pub fn check_non_membership(proof: &NonMembershipProof) -> Result<(), RejectionReason> {
    check_leaf_path(&proof.low_leaf, &proof.proof, proof.tree_length)?;
    check_gap(&proof.low_leaf, &proof.query_key)?;

    let computed = compute_root(hash_leaf(&proof.low_leaf), &proof.proof, proof.tree_length);
    if computed != proof.root {
        return Err(RejectionReason::RootMismatch);
    }

    Ok(())
}

/// Check that `key` falls strictly inside the gap opened by `low_leaf`.
///
/// Landing on either end of the gap means the key is present in the map.
pub fn check_gap(low_leaf: &Leaf, key: &Key) -> Result<(), RejectionReason> {
    if low_leaf.covers_gap(key) {
        return Ok(());
    }

    if *key == low_leaf.key || (!low_leaf.is_rightmost() && *key == low_leaf.next_key) {
        Err(RejectionReason::AlreadyExists)
    } else {
        Err(RejectionReason::OrderingViolation)
    }
}

#[cfg(test)]
mod tests {
    use super::{check_non_membership, verify_non_membership};
    use crate::{
        error::RejectionReason,
        test_utils::{k, TestTree},
        tree::SENTINEL_KEY,
    };

    fn tree() -> TestTree {
        let mut tree = TestTree::new();
        for (key, value) in [(44, 900), (10, 1), (99, 7)] {
            tree.insert(k(key), k(value));
        }
        tree
    }

    #[test]
    fn absent_keys_are_proven() {
        let tree = tree();
        for key in [1, 9, 11, 43, 45, 98, 100, 1000] {
            let proof = tree.non_membership(k(key));
            assert_eq!(check_non_membership(&proof), Ok(()), "key {key}");
        }
    }

    #[test]
    fn rightmost_leaf_covers_everything_above() {
        let tree = tree();
        let proof = tree.non_membership(k(1000));
        assert_eq!(proof.low_leaf.key, k(99));
        assert_eq!(proof.low_leaf.next_key, SENTINEL_KEY);
        assert!(verify_non_membership(&proof));
    }

    #[test]
    fn present_key_is_rejected() {
        let tree = tree();

        // The low leaf of 45 is 44; claiming 44 absent lands on the low leaf itself.
        let mut proof = tree.non_membership(k(45));
        proof.query_key = k(44);
        assert_eq!(
            check_non_membership(&proof),
            Err(RejectionReason::AlreadyExists)
        );

        // Landing on the successor.
        let mut proof = tree.non_membership(k(45));
        proof.query_key = k(99);
        assert_eq!(
            check_non_membership(&proof),
            Err(RejectionReason::AlreadyExists)
        );
    }

    #[test]
    fn key_outside_gap_is_rejected() {
        let tree = tree();

        let mut proof = tree.non_membership(k(45));
        proof.query_key = k(120);
        assert_eq!(
            check_non_membership(&proof),
            Err(RejectionReason::OrderingViolation)
        );

        let mut proof = tree.non_membership(k(45));
        proof.query_key = k(20);
        assert_eq!(
            check_non_membership(&proof),
            Err(RejectionReason::OrderingViolation)
        );
    }

    #[test]
    fn sentinel_key_can_never_be_absent() {
        let tree = tree();
        let mut proof = tree.non_membership(k(1));
        proof.query_key = SENTINEL_KEY;
        assert!(!verify_non_membership(&proof));
    }

    #[test]
    fn forged_low_leaf_is_rejected() {
        let tree = tree();

        // Widen the gap of 10 so it would cover 50: the leaf no longer hashes into the root.
        let mut proof = tree.non_membership(k(11));
        proof.low_leaf.next_key = SENTINEL_KEY;
        proof.query_key = k(50);
        assert_eq!(
            check_non_membership(&proof),
            Err(RejectionReason::RootMismatch)
        );
    }

    #[test]
    fn any_bit_flip_is_rejected() {
        let tree = tree();
        let proof = tree.non_membership(k(45));

        for level in 0..proof.proof.siblings.len() {
            let mut tampered = proof.clone();
            tampered.proof.siblings[level][31] ^= 1;
            assert!(!verify_non_membership(&tampered));

            let mut tampered = proof.clone();
            tampered.proof.path_indices[level] ^= true;
            assert!(!verify_non_membership(&tampered));
        }

        for bit in 0..256 {
            let mut tampered = proof.clone();
            tampered.low_leaf.value[bit / 8] ^= 1 << (bit % 8);
            assert!(!verify_non_membership(&tampered));

            let mut tampered = proof.clone();
            tampered.low_leaf.next_key[bit / 8] ^= 1 << (bit % 8);
            assert!(!verify_non_membership(&tampered));
        }
    }
}
