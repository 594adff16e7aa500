//! This module holds the interfaces the [crate::DisputeEngine] consumes from its collaborators, as well as the
//! [TraceProvider] used by off-engine participants.

use crate::{Batch, BatchIndex, ChallengeId, DisputeError, Identity};
use alloy_primitives::Bytes;
use anyhow::Result;
use thrain_primitives::Claim;

/// A [CommitmentStore] is the append-only log of submitted [Batch]es and their claimed post-state commitments.
///
/// Time is passed in by the caller so that the store stays a plain sequence with a finality gate.
pub trait CommitmentStore {
    /// Appends a new batch submitted at `now`, returning its index. The claimed root is accepted optimistically.
    fn append(
        &mut self,
        transactions: Vec<Bytes>,
        claimed_root: Claim,
        now: u64,
    ) -> Result<BatchIndex, DisputeError>;

    /// Finalizes the batch at `index`. Fails if it is already finalized or if its challenge window is still open
    /// at `now`.
    fn finalize(&mut self, index: BatchIndex, now: u64) -> Result<(), DisputeError>;

    /// Returns the batch at `index`.
    fn get(&self, index: BatchIndex) -> Result<&Batch, DisputeError>;

    /// Returns the number of batches in the store.
    fn len(&self) -> u64;

    /// Returns `true` if no batch was ever appended.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the length of the challenge window, in seconds.
    fn challenge_window(&self) -> u64;
}

/// An [IdentityRegistry] resolves the party responsible for defending a batch.
pub trait IdentityRegistry {
    /// Returns the defender of the batch at `index`, if one is registered.
    fn defender_of(&self, index: BatchIndex) -> Option<Identity>;

    /// Records `defender` as responsible for the batch at `index`.
    fn register(&mut self, index: BatchIndex, defender: Identity);
}

/// A [StepOracle] is the single-step source of truth of the dispute game. Implementations must be pure: the same
/// `(pre_state, transaction)` always yields the same post-state.
pub trait StepOracle {
    /// Applies one opaque transaction to `pre_state`, returning the post-state commitment.
    fn step(&self, pre_state: Claim, transaction: &[u8]) -> Claim;

    /// Applies every transaction in order starting from `pre_state`.
    fn execute<'a, I>(&self, pre_state: Claim, transactions: I) -> Claim
    where
        I: IntoIterator<Item = &'a Bytes>,
        Self: Sized,
    {
        transactions
            .into_iter()
            .fold(pre_state, |state, transaction| self.step(state, transaction))
    }
}

/// An [InvalidationHandler] is signalled when a challenger proves a batch's claimed root wrong.
pub trait InvalidationHandler {
    fn invalidate(&mut self, batch_index: BatchIndex, challenge_id: ChallengeId);
}

/// A [TraceProvider] is a type that can provide the commitment to the local view of a batch's execution trace at
/// any transaction index.
#[async_trait::async_trait]
pub trait TraceProvider: Send + Sync {
    /// Returns the commitment the trace starts from.
    async fn absolute_prestate_hash(&self) -> Result<Claim>;

    /// Returns the commitment after applying the first `index` transactions of the batch.
    async fn state_hash(&self, index: u64) -> Result<Claim>;

    /// Returns the number of transactions in the traced batch.
    fn transaction_count(&self) -> u64;
}
