/// Options when creating an [`crate::IndexedMerkleMap`].
#[derive(Debug, Clone)]
pub struct Options {
    /// Refuse to build update witnesses that write the value a key already holds.
    pub(crate) reject_noop_updates: bool,
    /// Run the core verifier on every witness before applying it.
    pub(crate) verify_witnesses: bool,
}

impl Options {
    /// Create a new `Options` instance with the default values.
    pub fn new() -> Self {
        Self {
            reject_noop_updates: true,
            verify_witnesses: true,
        }
    }

    /// Set whether update witnesses which don't change the value are refused.
    ///
    /// The verifier accepts such witnesses either way; this only affects what the map is
    /// willing to build.
    ///
    /// Default: on.
    pub fn reject_noop_updates(&mut self, reject_noop_updates: bool) {
        self.reject_noop_updates = reject_noop_updates;
    }

    /// Set whether witnesses are checked by the verifier before being applied.
    ///
    /// With this off, [`crate::IndexedMerkleMap::apply_insert`] and
    /// [`crate::IndexedMerkleMap::apply_update`] only check that the witness was built against
    /// the current root, and must only be handed witnesses built by the same map.
    ///
    /// Default: on.
    pub fn verify_witnesses(&mut self, verify_witnesses: bool) {
        self.verify_witnesses = verify_witnesses;
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}
