//! A naive in-memory tree for exercising the verifiers.

use crate::{
    hasher::{combine_root_with_length, empty_subtree_hashes, hash_leaf, hash_pair},
    path::index_to_path_indices,
    proof::{MembershipProof, NonMembershipProof},
    tree::{key_from_u64, Key, Leaf, MerkleProof, Node, Value, PROOF_DEPTH},
    witness::{InsertWitness, UpdateWitness},
};

pub fn k(value: u64) -> Key {
    key_from_u64(value)
}

#[derive(Clone)]
pub struct TestTree {
    leaves: Vec<Leaf>,
    zeros: [Node; PROOF_DEPTH + 1],
}

impl TestTree {
    pub fn new() -> Self {
        TestTree {
            leaves: vec![Leaf::genesis()],
            zeros: empty_subtree_hashes(),
        }
    }

    pub fn len(&self) -> u32 {
        self.leaves.len() as u32
    }

    // Recomputes the whole subtree each time; fine for a handful of leaves.
    fn node(&self, level: usize, position: u64) -> Node {
        let first_leaf = position << level;
        if first_leaf >= self.leaves.len() as u64 {
            return self.zeros[level];
        }
        if level == 0 {
            return hash_leaf(&self.leaves[position as usize]);
        }
        hash_pair(
            &self.node(level - 1, position * 2),
            &self.node(level - 1, position * 2 + 1),
        )
    }

    pub fn root(&self) -> Node {
        combine_root_with_length(&self.node(PROOF_DEPTH, 0), self.len())
    }

    pub fn proof(&self, index: u32) -> MerkleProof {
        let siblings = (0..PROOF_DEPTH)
            .map(|level| self.node(level, ((index as u64) >> level) ^ 1))
            .collect();
        MerkleProof {
            siblings,
            path_indices: index_to_path_indices(index),
        }
    }

    pub fn membership(&self, index: u32) -> MembershipProof {
        MembershipProof {
            leaf: self.leaves[index as usize],
            proof: self.proof(index),
            root: self.root(),
            tree_length: self.len(),
        }
    }

    fn low_leaf(&self, key: &Key) -> Leaf {
        *self
            .leaves
            .iter()
            .filter(|leaf| leaf.key < *key)
            .max_by_key(|leaf| leaf.key)
            .unwrap()
    }

    pub fn non_membership(&self, key: Key) -> NonMembershipProof {
        let low_leaf = self.low_leaf(&key);
        NonMembershipProof {
            low_leaf,
            proof: self.proof(low_leaf.index),
            root: self.root(),
            tree_length: self.len(),
            query_key: key,
        }
    }

    pub fn insert_witness(&self, key: Key, value: Value) -> InsertWitness {
        let old_root = self.root();
        let tree_length = self.len();
        let low_leaf = self.low_leaf(&key);
        let low_leaf_proof = self.proof(low_leaf.index);
        let updated_low_leaf = Leaf {
            next_key: key,
            ..low_leaf
        };
        let new_leaf = Leaf::new(key, value, low_leaf.next_key, tree_length);

        let mut intermediate = self.clone();
        intermediate.leaves[low_leaf.index as usize] = updated_low_leaf;
        let new_leaf_proof = intermediate.proof(tree_length);
        intermediate.leaves.push(new_leaf);

        InsertWitness {
            old_root,
            new_root: intermediate.root(),
            new_key: key,
            new_value: value,
            tree_length,
            low_leaf,
            low_leaf_proof,
            updated_low_leaf,
            new_leaf,
            new_leaf_proof,
        }
    }

    pub fn insert(&mut self, key: Key, value: Value) {
        let witness = self.insert_witness(key, value);
        self.leaves[witness.low_leaf.index as usize] = witness.updated_low_leaf;
        self.leaves.push(witness.new_leaf);
    }

    pub fn update_witness(&self, index: u32, value: Value) -> UpdateWitness {
        let membership = self.membership(index);
        let updated_leaf = Leaf {
            value,
            ..membership.leaf
        };
        let mut next = self.clone();
        next.leaves[index as usize] = updated_leaf;

        UpdateWitness {
            old_root: membership.root,
            new_root: next.root(),
            key: membership.leaf.key,
            old_value: membership.leaf.value,
            new_value: value,
            new_leaf_proof: membership.proof.clone(),
            membership,
            updated_leaf,
        }
    }

    pub fn update(&mut self, index: u32, value: Value) {
        self.leaves[index as usize].value = value;
    }
}
