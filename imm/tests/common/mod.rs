use imm::{IndexedMerkleMap, Ledger, ManualClock, Options};
use imm_core::{tree::key_from_u64, Key, Value};

#[allow(dead_code)]
pub fn account_key(id: u64) -> Key {
    // Spread keys over the whole key space, reproducibly, by seeding a PRNG with the id.
    use rand::{RngCore as _, SeedableRng as _};
    let mut seed = [0; 16];
    seed[0..8].copy_from_slice(&id.to_le_bytes());
    let mut rng = rand_pcg::Lcg64Xsh32::from_seed(seed);
    let mut key = Key::default();
    rng.fill_bytes(&mut key);
    key
}

#[allow(dead_code)]
pub fn value(v: u64) -> Value {
    key_from_u64(v)
}

pub struct Test {
    pub map: IndexedMerkleMap,
    pub ledger: Ledger<ManualClock>,
}

#[allow(dead_code)]
impl Test {
    pub fn new() -> Self {
        Self::with_options(Options::new())
    }

    pub fn with_options(options: Options) -> Self {
        let map = IndexedMerkleMap::new(options);
        let ledger = Ledger::new(map.root(), ManualClock::new(1_000));
        Test { map, ledger }
    }

    /// Build an insert witness, submit it to the ledger and apply it to the map.
    pub fn insert(&mut self, key: Key, value: Value) {
        let witness = self.map.build_insert_witness(key, value).unwrap();
        self.ledger
            .submit(&witness.clone().into())
            .unwrap();
        self.map.apply_insert(&witness).unwrap();
        assert_eq!(self.map.root(), self.ledger.root());
    }

    /// Build an update witness, submit it to the ledger and apply it to the map.
    pub fn update(&mut self, key: Key, value: Value) {
        let witness = self.map.build_update_witness(key, value).unwrap();
        self.ledger
            .submit(&witness.clone().into())
            .unwrap();
        self.map.apply_update(&witness).unwrap();
        assert_eq!(self.map.root(), self.ledger.root());
    }
}
