//! The in-memory [CommitmentStore].

use crate::{BatchIndex, CommitmentStore, DisputeError, Event, EventBus};
use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};
use thrain_primitives::Claim;

/// The [Batch] struct holds a submitted batch of opaque transactions and the post-state commitment its proposer
/// claims they produce. Everything but `finalized` is fixed at append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub index: BatchIndex,
    pub transactions: Vec<Bytes>,
    pub claimed_root: Claim,
    pub submitted_at: u64,
    pub finalized: bool,
}

impl Batch {
    pub fn transaction_count(&self) -> u64 {
        self.transactions.len() as u64
    }

    /// Returns the transaction at `index`.
    pub fn transaction(&self, index: u64) -> Option<&Bytes> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.transactions.get(index))
    }

    /// Returns the first instant at which the batch can no longer be challenged.
    pub fn window_closes_at(&self, challenge_window: u64) -> u64 {
        self.submitted_at.saturating_add(challenge_window)
    }
}

/// The [MemoryCommitmentStore] is a [CommitmentStore] backed by a vector. It only ever grows.
#[derive(Debug, Clone)]
pub struct MemoryCommitmentStore {
    batches: Vec<Batch>,
    challenge_window: u64,
    events: EventBus,
}

impl MemoryCommitmentStore {
    pub fn new(challenge_window: u64, events: EventBus) -> Self {
        Self {
            batches: Vec::new(),
            challenge_window,
            events,
        }
    }

    /// Returns every batch in submission order.
    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    fn get_mut(&mut self, index: BatchIndex) -> Result<&mut Batch, DisputeError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.batches.get_mut(i))
            .ok_or(DisputeError::OutOfRange(index))
    }
}

impl CommitmentStore for MemoryCommitmentStore {
    fn append(
        &mut self,
        transactions: Vec<Bytes>,
        claimed_root: Claim,
        now: u64,
    ) -> Result<BatchIndex, DisputeError> {
        if transactions.is_empty() {
            return Err(DisputeError::EmptyBatch);
        }

        let index = self.batches.len() as BatchIndex;
        self.batches.push(Batch {
            index,
            transactions,
            claimed_root,
            submitted_at: now,
            finalized: false,
        });
        self.events.publish(Event::BatchSubmitted {
            batch_index: index,
            claimed_root,
        });
        Ok(index)
    }

    fn finalize(&mut self, index: BatchIndex, now: u64) -> Result<(), DisputeError> {
        let challenge_window = self.challenge_window;
        let batch = self.get_mut(index)?;

        if batch.finalized {
            return Err(DisputeError::AlreadyFinalized(index));
        }
        let closes_at = batch.window_closes_at(challenge_window);
        if now < closes_at {
            return Err(DisputeError::WindowOpen {
                batch_index: index,
                closes_at,
            });
        }

        batch.finalized = true;
        self.events
            .publish(Event::BatchFinalized { batch_index: index });
        Ok(())
    }

    fn get(&self, index: BatchIndex) -> Result<&Batch, DisputeError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.batches.get(i))
            .ok_or(DisputeError::OutOfRange(index))
    }

    fn len(&self) -> u64 {
        self.batches.len() as u64
    }

    fn challenge_window(&self) -> u64 {
        self.challenge_window
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{commitment, Operation};
    use alloy_primitives::U256;

    const WINDOW: u64 = 100;

    fn store() -> (MemoryCommitmentStore, EventBus) {
        let events = EventBus::default();
        (MemoryCommitmentStore::new(WINDOW, events.clone()), events)
    }

    fn transactions() -> Vec<Bytes> {
        vec![Operation::add(5).encode(), Operation::multiply(2).encode()]
    }

    #[test]
    fn append_assigns_sequential_indices() {
        let (mut store, events) = store();
        let mut observer = events.subscribe();
        let root = commitment(U256::from(10));

        assert!(store.is_empty());
        assert_eq!(store.append(transactions(), root, 1).unwrap(), 0);
        assert_eq!(store.append(transactions(), root, 2).unwrap(), 1);
        assert_eq!(store.len(), 2);

        let batch = store.get(1).unwrap();
        assert_eq!(batch.submitted_at, 2);
        assert_eq!(batch.transaction_count(), 2);
        assert!(!batch.finalized);
        assert_eq!(
            observer.try_recv().unwrap(),
            Event::BatchSubmitted {
                batch_index: 0,
                claimed_root: root
            }
        );
    }

    #[test]
    fn append_rejects_empty_batches() {
        let (mut store, _) = store();
        assert_eq!(
            store.append(vec![], Claim::ZERO, 0),
            Err(DisputeError::EmptyBatch)
        );
        assert!(store.is_empty());
    }

    #[test]
    fn get_out_of_range() {
        let (store, _) = store();
        assert_eq!(store.get(0), Err(DisputeError::OutOfRange(0)));
    }

    #[test]
    fn finalize_respects_the_window() {
        let (mut store, events) = store();
        let index = store.append(transactions(), Claim::ZERO, 50).unwrap();
        let mut observer = events.subscribe();

        assert_eq!(
            store.finalize(index, 50 + WINDOW - 1),
            Err(DisputeError::WindowOpen {
                batch_index: index,
                closes_at: 50 + WINDOW
            })
        );
        assert!(!store.get(index).unwrap().finalized);

        store.finalize(index, 50 + WINDOW).unwrap();
        assert!(store.get(index).unwrap().finalized);
        assert_eq!(
            observer.try_recv().unwrap(),
            Event::BatchFinalized { batch_index: index }
        );

        assert_eq!(
            store.finalize(index, 50 + WINDOW + 1),
            Err(DisputeError::AlreadyFinalized(index))
        );
        assert_eq!(
            store.finalize(9, 1_000),
            Err(DisputeError::OutOfRange(9))
        );
    }

    #[test]
    fn window_saturates() {
        let batch = Batch {
            index: 0,
            transactions: transactions(),
            claimed_root: Claim::ZERO,
            submitted_at: u64::MAX - 1,
            finalized: false,
        };
        assert_eq!(batch.window_closes_at(WINDOW), u64::MAX);
        assert!(batch.transaction(2).is_none());
    }
}
