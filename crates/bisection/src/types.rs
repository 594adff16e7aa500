//! The types module holds the plain data types shared by the [crate::DisputeEngine] and its participants.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use thrain_primitives::{Claim, GameStatus};

/// Position of a batch within the [crate::CommitmentStore].
pub type BatchIndex = u64;

/// Identifier of a [crate::Challenge]. Assigned from a counter starting at 1.
pub type ChallengeId = u64;

/// The identity of a party taking part in a dispute.
pub type Identity = Address;

/// The commitment every batch's execution trace starts from.
pub const GENESIS_ROOT: Claim = Claim::ZERO;

/// The [Segment] is the disputed interval `[start, end)` of transaction indices within a batch, together with the
/// commitment agreed to hold before transaction `start` and the commitment claimed to hold after transaction
/// `end - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub start: u64,
    pub end: u64,
    pub start_root: Claim,
    pub end_root: Claim,
}

impl Segment {
    pub fn new(start: u64, end: u64, start_root: Claim, end_root: Claim) -> Self {
        Self {
            start,
            end,
            start_root,
            end_root,
        }
    }

    /// Returns the number of transactions covered by the segment.
    pub fn width(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the segment covers exactly one transaction and can be adjudicated.
    pub fn is_leaf(&self) -> bool {
        self.width() == 1
    }

    /// Returns `true` if `mid` lies strictly inside `(start, end)`.
    pub fn contains_strictly(&self, mid: u64) -> bool {
        self.start < mid && mid < self.end
    }

    /// Splits the segment at `mid`, committing to `mid_root` at the split point.
    ///
    /// ### Returns
    /// - `(left, right)`: `[start, mid)` and `[mid, end)` with their bounding commitments.
    pub fn split(&self, mid: u64, mid_root: Claim) -> (Segment, Segment) {
        (
            Segment::new(self.start, mid, self.start_root, mid_root),
            Segment::new(mid, self.end, mid_root, self.end_root),
        )
    }
}

/// The lifecycle phase of a [crate::Challenge].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Opened, no move accepted yet.
    Created,
    /// At least one move was accepted and the game is not resolved.
    Bisecting,
    /// Adjudicated. Terminal.
    Resolved,
}

/// The [BisectionResponse] enum describes the move a [crate::BisectionSolver] wants to make against a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BisectionResponse {
    /// The defender proposes the commitment `mid_root` after the first `mid` transactions.
    Bisect { mid: u64, mid_root: Claim },
    /// The challenger selects the segment it still disputes.
    Select(Segment),
    /// It is not the solver's turn.
    Wait,
    /// The challenge is already resolved with the given status.
    Resolved(GameStatus),
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::commitment;
    use alloy_primitives::U256;

    #[test]
    fn split_shares_the_midpoint() {
        let segment = Segment::new(0, 4, GENESIS_ROOT, commitment(U256::from(9)));
        let mid_root = commitment(U256::from(3));
        let (left, right) = segment.split(2, mid_root);

        assert_eq!(left, Segment::new(0, 2, GENESIS_ROOT, mid_root));
        assert_eq!(right, Segment::new(2, 4, mid_root, segment.end_root));
        assert_eq!(left.width() + right.width(), segment.width());
    }

    #[test]
    fn strict_containment() {
        let segment = Segment::new(3, 5, GENESIS_ROOT, GENESIS_ROOT);
        assert!(!segment.contains_strictly(3));
        assert!(segment.contains_strictly(4));
        assert!(!segment.contains_strictly(5));
        assert!(!Segment::new(3, 4, GENESIS_ROOT, GENESIS_ROOT).contains_strictly(3));
        assert!(Segment::new(3, 4, GENESIS_ROOT, GENESIS_ROOT).is_leaf());
    }
}
