//! The error module holds the [DisputeError] taxonomy. Every variant is a precondition violation surfaced to the
//! caller of the offending operation; a failed operation never changes state.

use crate::{BatchIndex, ChallengeId, Identity};
use thiserror::Error;
use thrain_primitives::Role;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisputeError {
    #[error("batch {0} does not exist")]
    OutOfRange(BatchIndex),

    #[error("batch {0} is already finalized")]
    AlreadyFinalized(BatchIndex),

    #[error("challenge window of batch {batch_index} is open until {closes_at}")]
    WindowOpen {
        batch_index: BatchIndex,
        closes_at: u64,
    },

    #[error("challenge window of batch {batch_index} closed at {closed_at}")]
    WindowClosed {
        batch_index: BatchIndex,
        closed_at: u64,
    },

    #[error("batch {0} is finalized and can no longer be challenged")]
    BatchFinalized(BatchIndex),

    #[error("a batch must contain at least one transaction")]
    EmptyBatch,

    #[error("no defender is registered for batch {0}")]
    DefenderUnknown(BatchIndex),

    #[error("challenge {0} does not exist")]
    UnknownChallenge(ChallengeId),

    #[error("challenge {0} is already resolved")]
    AlreadyResolved(ChallengeId),

    #[error("{caller} is not the defender of challenge {challenge_id}")]
    NotDefender {
        challenge_id: ChallengeId,
        caller: Identity,
    },

    #[error("{caller} is not the challenger of challenge {challenge_id}")]
    NotChallenger {
        challenge_id: ChallengeId,
        caller: Identity,
    },

    #[error("challenge {challenge_id} is waiting on the {expected:?}")]
    OutOfTurn {
        challenge_id: ChallengeId,
        expected: Role,
    },

    #[error("midpoint {mid} is not strictly inside [{start}, {end})")]
    InvalidMid { mid: u64, start: u64, end: u64 },

    #[error("segment [{start}, {end}) is not a valid selection: {reason}")]
    InvalidSegment {
        start: u64,
        end: u64,
        reason: &'static str,
    },

    #[error("batch {batch_index} has unresolved challenge {challenge_id}")]
    ChallengePending {
        batch_index: BatchIndex,
        challenge_id: ChallengeId,
    },
}
