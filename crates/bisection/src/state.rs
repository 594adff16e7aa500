//! This module contains the in-memory representation of a single bisection [Challenge].

use crate::{BatchIndex, ChallengeId, DisputeError, Identity, Phase, Segment, GENESIS_ROOT};
use serde::{Deserialize, Serialize};
use thrain_primitives::{Claim, DisputeGame, GameStatus, Role};

/// The [Challenge] struct holds the state of one dispute against a batch's claimed root.
///
/// The disputed [Segment] starts out as the whole batch, from the [GENESIS_ROOT] to the claimed root. The defender
/// bisects it, the challenger selects the half it still disputes, and once the segment covers a single transaction
/// the game is resolved against the single-step oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    id: ChallengeId,
    batch_index: BatchIndex,
    challenger: Identity,
    defender: Identity,
    /// The batch's claimed root at the time the challenge was opened.
    root_claim: Claim,
    /// The currently disputed segment.
    segment: Segment,
    /// The segment as it was before the defender's most recent bisection. Cleared by every selection.
    parent: Option<Segment>,
    /// The role whose move is expected.
    turn: Role,
    status: GameStatus,
    /// Number of moves accepted so far.
    rounds: u32,
    opened_at: u64,
}

impl Challenge {
    pub fn new(
        id: ChallengeId,
        batch_index: BatchIndex,
        challenger: Identity,
        defender: Identity,
        root_claim: Claim,
        transaction_count: u64,
        opened_at: u64,
    ) -> Self {
        let segment = Segment::new(0, transaction_count, GENESIS_ROOT, root_claim);
        // A single transaction cannot be bisected; the challenger confirms the segment directly.
        let turn = if segment.is_leaf() {
            Role::Challenger
        } else {
            Role::Defender
        };

        Self {
            id,
            batch_index,
            challenger,
            defender,
            root_claim,
            segment,
            parent: None,
            turn,
            status: GameStatus::InProgress,
            rounds: 0,
            opened_at,
        }
    }

    pub fn id(&self) -> ChallengeId {
        self.id
    }

    pub fn batch_index(&self) -> BatchIndex {
        self.batch_index
    }

    pub fn challenger(&self) -> Identity {
        self.challenger
    }

    pub fn defender(&self) -> Identity {
        self.defender
    }

    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    pub fn parent(&self) -> Option<&Segment> {
        self.parent.as_ref()
    }

    pub fn turn(&self) -> Role {
        self.turn
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn opened_at(&self) -> u64 {
        self.opened_at
    }

    pub fn is_resolved(&self) -> bool {
        self.status.is_resolved()
    }

    /// Returns the winning [Role] once resolved.
    pub fn winner(&self) -> Option<Role> {
        self.status.winner()
    }

    pub fn phase(&self) -> Phase {
        if self.is_resolved() {
            Phase::Resolved
        } else if self.rounds == 0 {
            Phase::Created
        } else {
            Phase::Bisecting
        }
    }

    /// Returns the segments the challenger may select on its turn: both halves of the last bisection, or the
    /// current segment when nothing was bisected yet.
    pub fn candidate_segments(&self) -> Vec<Segment> {
        match self.parent {
            Some(parent) => {
                let (left, right) = parent.split(self.segment.end, self.segment.end_root);
                vec![left, right]
            }
            None => vec![self.segment],
        }
    }

    /// Checks that `caller` may move as `role` right now.
    pub(crate) fn authorize(&self, caller: Identity, role: Role) -> Result<(), DisputeError> {
        if self.is_resolved() {
            return Err(DisputeError::AlreadyResolved(self.id));
        }

        match role {
            Role::Defender if caller != self.defender => {
                return Err(DisputeError::NotDefender {
                    challenge_id: self.id,
                    caller,
                })
            }
            Role::Challenger if caller != self.challenger => {
                return Err(DisputeError::NotChallenger {
                    challenge_id: self.id,
                    caller,
                })
            }
            _ => {}
        }

        if self.turn != role {
            return Err(DisputeError::OutOfTurn {
                challenge_id: self.id,
                expected: self.turn,
            });
        }
        Ok(())
    }

    /// Applies the defender's bisection: the segment now ends at `mid` with `mid_root`.
    pub(crate) fn bisect(&mut self, mid: u64, mid_root: Claim) -> Result<(), DisputeError> {
        if !self.segment.contains_strictly(mid) {
            return Err(DisputeError::InvalidMid {
                mid,
                start: self.segment.start,
                end: self.segment.end,
            });
        }

        self.parent = Some(self.segment);
        self.segment.end = mid;
        self.segment.end_root = mid_root;
        self.turn = self.turn.opponent();
        self.rounds += 1;
        Ok(())
    }

    /// Applies the challenger's selection. The caller validates the segment beforehand.
    pub(crate) fn select(&mut self, segment: Segment) {
        self.segment = segment;
        self.parent = None;
        self.turn = self.turn.opponent();
        self.rounds += 1;
    }
}

impl DisputeGame for Challenge {
    fn root_claim(&self) -> Claim {
        self.root_claim
    }

    fn status(&self) -> &GameStatus {
        &self.status
    }

    /// The defender wins iff the oracle's post-state matches the commitment the segment ends on.
    fn resolve(&mut self, post_state: Claim) -> &GameStatus {
        if !self.is_resolved() {
            self.status = if post_state == self.segment.end_root {
                GameStatus::DefenderWins
            } else {
                GameStatus::ChallengerWins
            };
        }
        &self.status
    }
}
