//! Notifications published by the [crate::CommitmentStore] and the [crate::DisputeEngine].

use crate::{BatchIndex, ChallengeId, Identity};
use serde::{Deserialize, Serialize};
use thrain_primitives::Claim;
use tokio::sync::broadcast;
use tracing::info;

/// The default capacity of an [EventBus]. Lagging subscribers lose the oldest events first.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// The [Event] enum lists every notification observers can track a batch or a game by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    BatchSubmitted {
        batch_index: BatchIndex,
        claimed_root: Claim,
    },
    BatchFinalized {
        batch_index: BatchIndex,
    },
    ChallengeOpened {
        challenge_id: ChallengeId,
        batch_index: BatchIndex,
        challenger: Identity,
    },
    /// Emitted after both defender bisections and challenger selections.
    ChallengeBisected {
        challenge_id: ChallengeId,
        start: u64,
        end: u64,
        start_root: Claim,
        end_root: Claim,
    },
    ChallengeResolved {
        challenge_id: ChallengeId,
        defender_wins: bool,
    },
}

/// The [EventBus] fans [Event]s out to every subscriber and mirrors them to the log.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Returns a receiver observing every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Publishes `event`. Publishing with no subscriber is not an error.
    pub fn publish(&self, event: Event) {
        match &event {
            Event::BatchSubmitted {
                batch_index,
                claimed_root,
            } => info!(batch_index, %claimed_root, "batch submitted"),
            Event::BatchFinalized { batch_index } => info!(batch_index, "batch finalized"),
            Event::ChallengeOpened {
                challenge_id,
                batch_index,
                challenger,
            } => info!(challenge_id, batch_index, %challenger, "challenge opened"),
            Event::ChallengeBisected {
                challenge_id,
                start,
                end,
                start_root,
                end_root,
            } => info!(
                challenge_id,
                start,
                end,
                %start_root,
                %end_root,
                "challenge bisected"
            ),
            Event::ChallengeResolved {
                challenge_id,
                defender_wins,
            } => info!(challenge_id, defender_wins, "challenge resolved"),
        }

        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
