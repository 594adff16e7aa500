//! The [DisputeEngine] owns every [Challenge] and drives each one from creation to adjudication.

use crate::{
    BatchIndex, Challenge, ChallengeId, Clock, CommitmentStore, DisputeConfig, DisputeError, Event,
    EventBus, Identity, IdentityRegistry, InvalidationHandler, MemoryCommitmentStore, Segment,
    StepOracle, SubmitterRegistry,
};
use alloy_primitives::Bytes;
use std::collections::BTreeMap;
use thrain_primitives::{chain_rules, rule::Rule, Claim, DisputeGame, GameStatus, Role};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// The [DisputeEngine] is the bisection game state machine.
///
/// Every operation is a single transition: it either applies its whole effect and publishes its [Event], or fails
/// with a [DisputeError] and leaves the engine untouched. Challenges are independent of one another and only share
/// read access to the [CommitmentStore] and the [IdentityRegistry].
pub struct DisputeEngine<S, R, O, C> {
    config: DisputeConfig,
    store: S,
    registry: R,
    oracle: O,
    clock: C,
    challenges: BTreeMap<ChallengeId, Challenge>,
    next_challenge_id: ChallengeId,
    invalidation: Option<Box<dyn InvalidationHandler + Send>>,
    events: EventBus,
}

impl<O, C> DisputeEngine<MemoryCommitmentStore, SubmitterRegistry, O, C>
where
    O: StepOracle,
    C: Clock,
{
    /// Creates an engine over an empty in-memory store whose challenge window is taken from `config`.
    pub fn in_memory(config: DisputeConfig, oracle: O, clock: C) -> Self {
        let events = EventBus::new(config.event_capacity);
        let store = MemoryCommitmentStore::new(config.challenge_window_secs, events.clone());
        Self::new(config, store, SubmitterRegistry::default(), oracle, clock, events)
    }
}

impl<S, R, O, C> DisputeEngine<S, R, O, C>
where
    S: CommitmentStore,
    R: IdentityRegistry,
    O: StepOracle,
    C: Clock,
{
    /// Creates an engine over existing collaborators. The challenge window is the store's; `events` should be the
    /// bus the store publishes to so that observers see a single ordered stream.
    pub fn new(
        config: DisputeConfig,
        store: S,
        registry: R,
        oracle: O,
        clock: C,
        events: EventBus,
    ) -> Self {
        Self {
            config,
            store,
            registry,
            oracle,
            clock,
            challenges: BTreeMap::new(),
            next_challenge_id: 1,
            invalidation: None,
            events,
        }
    }

    /// Installs the handler signalled whenever a challenger wins.
    pub fn with_invalidation_handler(
        mut self,
        handler: impl InvalidationHandler + Send + 'static,
    ) -> Self {
        self.invalidation = Some(Box::new(handler));
        self
    }

    pub fn config(&self) -> &DisputeConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Returns a receiver for every [Event] published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Returns the challenge with the given id.
    pub fn challenge(&self, challenge_id: ChallengeId) -> Result<&Challenge, DisputeError> {
        self.challenges
            .get(&challenge_id)
            .ok_or(DisputeError::UnknownChallenge(challenge_id))
    }

    /// Returns every challenge ever opened against the batch, in opening order.
    pub fn challenges_for(&self, batch_index: BatchIndex) -> impl Iterator<Item = &Challenge> {
        self.challenges
            .values()
            .filter(move |challenge| challenge.batch_index() == batch_index)
    }

    /// Appends a batch on behalf of `proposer` and registers the proposer as its defender.
    pub fn submit_batch(
        &mut self,
        proposer: Identity,
        transactions: Vec<Bytes>,
        claimed_root: Claim,
    ) -> Result<BatchIndex, DisputeError> {
        let now = self.clock.now();
        let batch_index = self.store.append(transactions, claimed_root, now)?;
        self.registry.register(batch_index, proposer);
        Ok(batch_index)
    }

    /// Finalizes a batch once its challenge window has elapsed. With [DisputeConfig::gate_finalization] set, a
    /// batch with an unresolved challenge cannot be finalized.
    pub fn finalize_batch(&mut self, batch_index: BatchIndex) -> Result<(), DisputeError> {
        if self.config.gate_finalization {
            if let Some(pending) = self
                .challenges_for(batch_index)
                .find(|challenge| !challenge.is_resolved())
            {
                return Err(DisputeError::ChallengePending {
                    batch_index,
                    challenge_id: pending.id(),
                });
            }
        }

        let now = self.clock.now();
        self.store.finalize(batch_index, now)
    }

    /// Opens a challenge against the batch's claimed root.
    ///
    /// ### Takes
    /// - `batch_index`: The batch being disputed. It must be unfinalized and inside its challenge window.
    /// - `challenger`: The identity allowed to select segments in the new game.
    ///
    /// ### Returns
    /// - The id of the new challenge, or the [DisputeError] that prevented it from opening.
    pub fn open_challenge(
        &mut self,
        batch_index: BatchIndex,
        challenger: Identity,
    ) -> Result<ChallengeId, DisputeError> {
        let now = self.clock.now();
        let batch = self.store.get(batch_index)?;

        if batch.finalized {
            return Err(DisputeError::BatchFinalized(batch_index));
        }
        let closes_at = batch.window_closes_at(self.store.challenge_window());
        if now >= closes_at {
            return Err(DisputeError::WindowClosed {
                batch_index,
                closed_at: closes_at,
            });
        }
        if batch.transactions.is_empty() {
            return Err(DisputeError::EmptyBatch);
        }
        let defender = self
            .registry
            .defender_of(batch_index)
            .ok_or(DisputeError::DefenderUnknown(batch_index))?;

        let challenge_id = self.next_challenge_id;
        let challenge = Challenge::new(
            challenge_id,
            batch_index,
            challenger,
            defender,
            batch.claimed_root,
            batch.transaction_count(),
            now,
        );
        self.next_challenge_id += 1;
        self.challenges.insert(challenge_id, challenge);

        self.events.publish(Event::ChallengeOpened {
            challenge_id,
            batch_index,
            challenger,
        });
        Ok(challenge_id)
    }

    /// The defender's move: proposes `mid_root` as the commitment after the first `mid` transactions. The disputed
    /// segment becomes `[start, mid)`.
    pub fn bisect(
        &mut self,
        challenge_id: ChallengeId,
        caller: Identity,
        mid: u64,
        mid_root: Claim,
    ) -> Result<(), DisputeError> {
        let challenge = self
            .challenges
            .get_mut(&challenge_id)
            .ok_or(DisputeError::UnknownChallenge(challenge_id))?;

        challenge
            .authorize(caller, Role::Defender)
            .and_then(|_| challenge.bisect(mid, mid_root))
            .map_err(|e| {
                debug!(challenge_id, %caller, mid, error = %e, "rejected bisection");
                e
            })?;

        let segment = *challenge.segment();
        self.events.publish(bisected(challenge_id, &segment));
        Ok(())
    }

    /// The challenger's move: selects the segment it still disputes. A single-transaction segment is adjudicated as
    /// part of the same call.
    ///
    /// ### Returns
    /// - The [GameStatus] after the move, or the [DisputeError] that rejected it.
    pub fn select_segment(
        &mut self,
        challenge_id: ChallengeId,
        caller: Identity,
        start: u64,
        end: u64,
        (start_root, end_root): (Claim, Claim),
    ) -> Result<GameStatus, DisputeError> {
        let strict = self.config.strict_segments;
        let challenge = self
            .challenges
            .get_mut(&challenge_id)
            .ok_or(DisputeError::UnknownChallenge(challenge_id))?;
        let batch = self.store.get(challenge.batch_index())?;
        let segment = Segment::new(start, end, start_root, end_root);
        let transaction_count = batch.transaction_count();

        let candidates = challenge.candidate_segments();
        let non_empty: Rule<Segment, DisputeError> = Box::new(|segment: Segment| {
            if segment.start < segment.end {
                Ok(segment)
            } else {
                Err(invalid_segment(&segment, "segment is empty"))
            }
        });
        let within_batch: Rule<Segment, DisputeError> = Box::new(move |segment: Segment| {
            if segment.end <= transaction_count {
                Ok(segment)
            } else {
                Err(invalid_segment(&segment, "segment exceeds the batch"))
            }
        });
        let bisected_half: Rule<Segment, DisputeError> = Box::new(move |segment: Segment| {
            if !strict || candidates.contains(&segment) {
                Ok(segment)
            } else {
                Err(invalid_segment(
                    &segment,
                    "segment is not a half of the last bisection",
                ))
            }
        });

        let segment = challenge
            .authorize(caller, Role::Challenger)
            .and_then(|_| chain_rules!(segment, non_empty, within_batch, bisected_half))
            .map_err(|e| {
                debug!(challenge_id, %caller, start, end, error = %e, "rejected selection");
                e
            })?;

        // Computed before any mutation so that adjudication cannot fail halfway through the move.
        let post_state = if segment.is_leaf() {
            let transaction = batch
                .transaction(segment.start)
                .ok_or(DisputeError::OutOfRange(challenge.batch_index()))?;
            Some(self.oracle.step(segment.start_root, transaction))
        } else {
            None
        };

        challenge.select(segment);
        self.events.publish(bisected(challenge_id, &segment));

        match post_state {
            Some(post_state) => Ok(self.adjudicate(challenge_id, post_state)),
            None => Ok(GameStatus::InProgress),
        }
    }

    /// Resolves a challenge whose segment covers a single transaction against the oracle's `post_state`.
    fn adjudicate(&mut self, challenge_id: ChallengeId, post_state: Claim) -> GameStatus {
        let Some(challenge) = self.challenges.get_mut(&challenge_id) else {
            return GameStatus::InProgress;
        };
        let status = *challenge.resolve(post_state);
        let batch_index = challenge.batch_index();
        debug!(
            challenge_id,
            transaction = challenge.segment().start,
            %post_state,
            claimed = %challenge.segment().end_root,
            "adjudicated single step"
        );

        self.events.publish(Event::ChallengeResolved {
            challenge_id,
            defender_wins: status == GameStatus::DefenderWins,
        });

        if status == GameStatus::ChallengerWins {
            match self.invalidation.as_mut() {
                Some(handler) => handler.invalidate(batch_index, challenge_id),
                None => warn!(
                    challenge_id,
                    batch_index, "challenger won but no invalidation handler is installed"
                ),
            }
        }
        status
    }
}

fn bisected(challenge_id: ChallengeId, segment: &Segment) -> Event {
    Event::ChallengeBisected {
        challenge_id,
        start: segment.start,
        end: segment.end,
        start_root: segment.start_root,
        end_root: segment.end_root,
    }
}

fn invalid_segment(segment: &Segment, reason: &'static str) -> DisputeError {
    DisputeError::InvalidSegment {
        start: segment.start,
        end: segment.end,
        reason,
    }
}
