//! An in-memory Indexed Merkle Map which builds proofs and witnesses for the core verifiers.
//!
//! Only non-empty nodes are stored: each level keeps a map from position to node and falls
//! back to the precomputed hash of an empty subtree of that height. A map of `n` leaves
//! therefore holds `O(n * TREE_HEIGHT)` nodes regardless of capacity.

use std::collections::BTreeMap;

use fxhash::FxHashMap;
use imm_core::{
    hasher::{combine_root_with_length, compute_root, empty_subtree_hashes, hash_leaf, hash_pair},
    path::{hash_up_to_level, index_to_path_indices},
    tree::{CAPACITY, PROOF_DEPTH, SENTINEL_KEY},
    InsertWitness, Key, Leaf, MembershipProof, MerkleProof, Node, NonMembershipProof,
    UpdateWitness, Value,
};

use crate::{error::MapError, options::Options};

/// An authenticated sorted map of 32-byte keys to 32-byte values.
///
/// A fresh map holds the sentinel leaf with the all-zero key at index 0, so its length is 1.
/// Every other key is appended at the next free index and spliced into the sorted list of
/// leaves after its low leaf.
pub struct IndexedMerkleMap {
    options: Options,
    leaves: FxHashMap<u32, Leaf>,
    keys: BTreeMap<Key, u32>,
    // nodes[level][position]; level 0 holds leaf hashes and level PROOF_DEPTH the internal root.
    nodes: Vec<FxHashMap<u32, Node>>,
    zeros: [Node; PROOF_DEPTH + 1],
    length: u32,
}

impl IndexedMerkleMap {
    /// Create a map holding only the sentinel leaf.
    pub fn new(options: Options) -> Self {
        let mut map = IndexedMerkleMap {
            options,
            leaves: FxHashMap::default(),
            keys: BTreeMap::new(),
            nodes: vec![FxHashMap::default(); PROOF_DEPTH + 1],
            zeros: empty_subtree_hashes(),
            length: 1,
        };
        map.write_leaf(Leaf::genesis());
        map
    }

    /// The root committing to every leaf and the length.
    pub fn root(&self) -> Node {
        combine_root_with_length(&self.node(PROOF_DEPTH, 0), self.length)
    }

    /// The number of occupied slots, sentinel included.
    pub fn len(&self) -> u32 {
        self.length
    }

    /// Whether the map holds no keys besides the sentinel.
    pub fn is_empty(&self) -> bool {
        self.length == 1
    }

    /// Get the value stored under a key.
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.leaf(key).map(|leaf| &leaf.value)
    }

    /// Get the leaf of a key.
    pub fn leaf(&self, key: &Key) -> Option<&Leaf> {
        self.keys.get(key).and_then(|index| self.leaves.get(index))
    }

    /// Iterate all leaves in ascending key order, starting with the sentinel.
    pub fn sorted_leaves(&self) -> impl Iterator<Item = &Leaf> + '_ {
        self.keys
            .values()
            .filter_map(move |index| self.leaves.get(index))
    }

    /// The leaf with the greatest key strictly below `key`.
    ///
    /// `None` only for the zero key, which has no predecessor.
    pub fn low_leaf(&self, key: &Key) -> Option<&Leaf> {
        self.keys
            .range(..*key)
            .next_back()
            .and_then(|(_, index)| self.leaves.get(index))
    }

    /// The path from the slot at `index` to the root. `None` past the capacity of the tree.
    pub fn merkle_proof(&self, index: u32) -> Option<MerkleProof> {
        if index >= CAPACITY {
            return None;
        }
        Some(self.path(index))
    }

    // Callers keep `index` below CAPACITY.
    fn path(&self, index: u32) -> MerkleProof {
        let siblings = (0..PROOF_DEPTH)
            .map(|level| self.node(level, (index >> level) ^ 1))
            .collect();
        MerkleProof {
            siblings,
            path_indices: index_to_path_indices(index),
        }
    }

    /// Prove that `key` is present with its current value.
    pub fn membership_proof(&self, key: &Key) -> Option<MembershipProof> {
        let leaf = *self.leaf(key)?;
        Some(MembershipProof {
            leaf,
            proof: self.path(leaf.index),
            root: self.root(),
            tree_length: self.length,
        })
    }

    /// Prove that `key` is absent. `None` if it is present.
    pub fn non_membership_proof(&self, key: &Key) -> Option<NonMembershipProof> {
        if self.keys.contains_key(key) {
            return None;
        }
        let low_leaf = *self.low_leaf(key)?;
        Some(NonMembershipProof {
            low_leaf,
            proof: self.path(low_leaf.index),
            root: self.root(),
            tree_length: self.length,
            query_key: *key,
        })
    }

    /// Build a witness for inserting `key` with `value`, without changing the map.
    pub fn build_insert_witness(&self, key: Key, value: Value) -> Result<InsertWitness, MapError> {
        if key == SENTINEL_KEY {
            return Err(MapError::ZeroKey);
        }
        if self.keys.contains_key(&key) {
            return Err(MapError::KeyAlreadyExists);
        }
        if self.length >= CAPACITY {
            return Err(MapError::TreeFull);
        }

        let tree_length = self.length;
        let low_leaf = *self.low_leaf(&key).ok_or(MapError::ZeroKey)?;
        let low_leaf_proof = self.path(low_leaf.index);
        let updated_low_leaf = Leaf {
            next_key: key,
            ..low_leaf
        };
        let new_leaf = Leaf::new(key, value, low_leaf.next_key, tree_length);

        // The new slot's path through the tree with the low leaf already updated. Only the
        // sibling at the level where the two paths meet covers the low leaf; below it the
        // subtrees are the new slot's own, above it they hold neither leaf.
        let mut new_leaf_proof = self.path(tree_length);
        // low_leaf.index < tree_length, so the two differ; the paths meet above the highest
        // differing bit.
        let lca = (u32::BITS - 1 - (low_leaf.index ^ tree_length).leading_zeros()) as usize;
        new_leaf_proof.siblings[lca] = hash_up_to_level(
            hash_leaf(&updated_low_leaf),
            &low_leaf_proof.siblings,
            &low_leaf_proof.path_indices,
            lca as u8,
        );

        let new_root = compute_root(hash_leaf(&new_leaf), &new_leaf_proof, tree_length + 1);

        Ok(InsertWitness {
            old_root: self.root(),
            new_root,
            new_key: key,
            new_value: value,
            tree_length,
            low_leaf,
            low_leaf_proof,
            updated_low_leaf,
            new_leaf,
            new_leaf_proof,
        })
    }

    /// Build a witness for setting the value of an existing `key`, without changing the map.
    pub fn build_update_witness(&self, key: Key, value: Value) -> Result<UpdateWitness, MapError> {
        if key == SENTINEL_KEY {
            return Err(MapError::ZeroKey);
        }
        let membership = self
            .membership_proof(&key)
            .ok_or(MapError::KeyDoesNotExist)?;
        if self.options.reject_noop_updates && membership.leaf.value == value {
            return Err(MapError::NoOpUpdate);
        }

        let updated_leaf = Leaf {
            value,
            ..membership.leaf
        };
        let new_root = compute_root(
            hash_leaf(&updated_leaf),
            &membership.proof,
            membership.tree_length,
        );

        Ok(UpdateWitness {
            old_root: membership.root,
            new_root,
            key,
            old_value: membership.leaf.value,
            new_value: value,
            new_leaf_proof: membership.proof.clone(),
            membership,
            updated_leaf,
        })
    }

    /// Apply an insert witness built against the current root. Returns the new root.
    pub fn apply_insert(&mut self, witness: &InsertWitness) -> Result<Node, MapError> {
        if witness.old_root != self.root() {
            return Err(MapError::StaleWitness);
        }
        if self.options.verify_witnesses {
            imm_core::verify_insert(witness)?;
        }

        self.write_leaf(witness.updated_low_leaf);
        self.write_leaf(witness.new_leaf);
        self.length += 1;

        debug_assert_eq!(self.root(), witness.new_root);
        Ok(witness.new_root)
    }

    /// Apply an update witness built against the current root. Returns the new root.
    pub fn apply_update(&mut self, witness: &UpdateWitness) -> Result<Node, MapError> {
        if witness.old_root != self.root() {
            return Err(MapError::StaleWitness);
        }
        if self.options.verify_witnesses {
            imm_core::verify_update(witness)?;
        }

        self.write_leaf(witness.updated_leaf);

        debug_assert_eq!(self.root(), witness.new_root);
        Ok(witness.new_root)
    }

    /// Insert a new key. Returns the new root.
    pub fn insert(&mut self, key: Key, value: Value) -> Result<Node, MapError> {
        let witness = self.build_insert_witness(key, value)?;
        self.apply_insert(&witness)
    }

    /// Change the value of an existing key. Returns the new root.
    pub fn update(&mut self, key: Key, value: Value) -> Result<Node, MapError> {
        let witness = self.build_update_witness(key, value)?;
        self.apply_update(&witness)
    }

    /// Insert `key`, or update it if it is already present. Writing the value a key already
    /// holds leaves the map untouched.
    pub fn set(&mut self, key: Key, value: Value) -> Result<Node, MapError> {
        match self.get(&key) {
            None => self.insert(key, value),
            Some(current) if *current == value => Ok(self.root()),
            Some(_) => self.update(key, value),
        }
    }

    fn node(&self, level: usize, position: u32) -> Node {
        self.nodes[level]
            .get(&position)
            .copied()
            .unwrap_or(self.zeros[level])
    }

    // Store a leaf at its index and rehash its path to the root.
    fn write_leaf(&mut self, leaf: Leaf) {
        let mut position = leaf.index;
        let mut node = hash_leaf(&leaf);
        self.nodes[0].insert(position, node);

        for level in 0..PROOF_DEPTH {
            let sibling = self.node(level, position ^ 1);
            node = if position & 1 == 0 {
                hash_pair(&node, &sibling)
            } else {
                hash_pair(&sibling, &node)
            };
            position >>= 1;
            self.nodes[level + 1].insert(position, node);
        }

        self.keys.insert(leaf.key, leaf.index);
        self.leaves.insert(leaf.index, leaf);
    }
}

impl Default for IndexedMerkleMap {
    fn default() -> Self {
        Self::new(Options::default())
    }
}
