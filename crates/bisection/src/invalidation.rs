//! An [InvalidationHandler] that records every signal it receives.

use crate::{BatchIndex, ChallengeId, InvalidationHandler};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// A batch proven fraudulent by a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invalidation {
    pub batch_index: BatchIndex,
    pub challenge_id: ChallengeId,
}

/// The [InvalidationLog] keeps every [Invalidation] in the order it was signalled. Clones share the same log, so
/// one clone can be handed to the engine while another is read.
#[derive(Debug, Clone, Default)]
pub struct InvalidationLog {
    entries: Arc<Mutex<Vec<Invalidation>>>,
}

impl InvalidationLog {
    pub fn entries(&self) -> Vec<Invalidation> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Returns `true` if any challenge invalidated the batch at `batch_index`.
    pub fn is_invalidated(&self, batch_index: BatchIndex) -> bool {
        self.entries()
            .iter()
            .any(|entry| entry.batch_index == batch_index)
    }
}

impl InvalidationHandler for InvalidationLog {
    fn invalidate(&mut self, batch_index: BatchIndex, challenge_id: ChallengeId) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(Invalidation {
                batch_index,
                challenge_id,
            });
        }
    }
}
