//! The [SubmitterRegistry] records the submitter of every batch as its defender.

use crate::{BatchIndex, Identity, IdentityRegistry};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct SubmitterRegistry {
    defenders: HashMap<BatchIndex, Identity>,
}

impl IdentityRegistry for SubmitterRegistry {
    fn defender_of(&self, index: BatchIndex) -> Option<Identity> {
        self.defenders.get(&index).copied()
    }

    /// The first registration for a batch is kept; the defender of a batch never changes.
    fn register(&mut self, index: BatchIndex, defender: Identity) {
        self.defenders.entry(index).or_insert(defender);
    }
}
