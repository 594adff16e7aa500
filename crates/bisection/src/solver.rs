//! This module contains the [BisectionSolver], an honest participant in a bisection [Challenge].

use crate::{BisectionResponse, Challenge, Identity, TraceProvider};
use anyhow::{bail, Result};
use thrain_primitives::{Claim, DisputeGame, DisputeSolver, Role};

/// A [BisectionSolver] plays one side of a [Challenge] honestly, according to its local [TraceProvider].
///
/// - As the defender, it bisects the disputed segment in the middle and commits to its local root there.
/// - As the challenger, it keeps disputing the half whose end commitment it disagrees with.
pub struct BisectionSolver<P: TraceProvider> {
    pub provider: P,
    pub role: Role,
    pub identity: Identity,
}

impl<P: TraceProvider> BisectionSolver<P> {
    pub fn new(provider: P, role: Role, identity: Identity) -> Self {
        Self {
            provider,
            role,
            identity,
        }
    }

    pub fn defender(provider: P, identity: Identity) -> Self {
        Self::new(provider, Role::Defender, identity)
    }

    pub fn challenger(provider: P, identity: Identity) -> Self {
        Self::new(provider, Role::Challenger, identity)
    }

    /// Returns `true` if the local trace disagrees with a batch's `claimed_root`.
    pub async fn should_challenge(&self, claimed_root: Claim) -> Result<bool> {
        let local_root = self
            .provider
            .state_hash(self.provider.transaction_count())
            .await?;
        Ok(local_root != claimed_root)
    }

    async fn bisect(&self, game: &Challenge) -> Result<BisectionResponse> {
        let segment = game.segment();
        if segment.width() < 2 {
            bail!(
                "segment [{}, {}) of challenge {} cannot be bisected",
                segment.start,
                segment.end,
                game.id()
            );
        }

        let mid = segment.start + segment.width() / 2;
        let mid_root = self.provider.state_hash(mid).await?;
        Ok(BisectionResponse::Bisect { mid, mid_root })
    }

    async fn select(&self, game: &Challenge) -> Result<BisectionResponse> {
        let Some(parent) = game.parent() else {
            // Nothing was bisected; the opening segment is the only selection.
            return Ok(BisectionResponse::Select(*game.segment()));
        };

        let (mid, mid_root) = (game.segment().end, game.segment().end_root);
        let (left, right) = parent.split(mid, mid_root);
        let local_mid_root = self.provider.state_hash(mid).await?;

        // Agreeing with the midpoint moves the dispute into the right half.
        if local_mid_root == mid_root {
            Ok(BisectionResponse::Select(right))
        } else {
            Ok(BisectionResponse::Select(left))
        }
    }
}

#[async_trait::async_trait]
impl<P: TraceProvider> DisputeSolver<Challenge, BisectionResponse> for BisectionSolver<P> {
    async fn respond(&self, game: &Challenge) -> Result<BisectionResponse> {
        if game.is_resolved() {
            return Ok(BisectionResponse::Resolved(*game.status()));
        }
        if game.turn() != self.role {
            return Ok(BisectionResponse::Wait);
        }

        match self.role {
            Role::Defender => self.bisect(game).await,
            Role::Challenger => self.select(game).await,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        commitment, providers::mocks::FaultyTraceProvider, providers::ExecutionTraceProvider,
        ArithmeticOracle, Operation, Segment, GENESIS_ROOT,
    };
    use alloy_primitives::{Address, Bytes, U256};
    use thrain_primitives::GameStatus;

    const DEFENDER: Address = Address::new([0xde; 20]);
    const CHALLENGER: Address = Address::new([0xc4; 20]);

    fn root(value: u64) -> Claim {
        commitment(U256::from(value))
    }

    /// `[add 1, add 2, multiply 3, add 4]` walks the state through 0, 1, 3, 9, 13.
    fn transactions() -> Vec<Bytes> {
        [
            Operation::add(1),
            Operation::add(2),
            Operation::multiply(3),
            Operation::add(4),
        ]
        .iter()
        .map(Operation::encode)
        .collect()
    }

    fn honest() -> ExecutionTraceProvider {
        ExecutionTraceProvider::new(&ArithmeticOracle, &transactions())
    }

    #[tokio::test]
    async fn defender_bisects_in_the_middle() {
        let solver = BisectionSolver::defender(honest(), DEFENDER);
        let game = Challenge::new(1, 0, CHALLENGER, DEFENDER, root(13), 4, 0);

        assert_eq!(
            solver.respond(&game).await.unwrap(),
            BisectionResponse::Bisect {
                mid: 2,
                mid_root: root(3)
            }
        );
    }

    #[tokio::test]
    async fn solvers_wait_for_their_turn() {
        let game = Challenge::new(1, 0, CHALLENGER, DEFENDER, root(13), 4, 0);
        let solver = BisectionSolver::challenger(honest(), CHALLENGER);
        assert_eq!(
            solver.respond(&game).await.unwrap(),
            BisectionResponse::Wait
        );
    }

    #[tokio::test]
    async fn challenger_follows_its_disagreement() {
        let solver = BisectionSolver::challenger(honest(), CHALLENGER);
        let cases = [
            // Agrees with the midpoint; disputes the second half.
            (root(3), Segment::new(2, 4, root(3), root(14))),
            // Disagrees with the midpoint; disputes the first half.
            (root(4), Segment::new(0, 2, GENESIS_ROOT, root(4))),
        ];

        for (mid_root, expected) in cases {
            let mut game = Challenge::new(1, 0, CHALLENGER, DEFENDER, root(14), 4, 0);
            game.bisect(2, mid_root).unwrap();
            assert_eq!(
                solver.respond(&game).await.unwrap(),
                BisectionResponse::Select(expected)
            );
        }
    }

    #[tokio::test]
    async fn challenger_confirms_a_single_transaction() {
        let solver = BisectionSolver::challenger(honest(), CHALLENGER);
        let game = Challenge::new(1, 0, CHALLENGER, DEFENDER, root(2), 1, 0);
        assert_eq!(
            solver.respond(&game).await.unwrap(),
            BisectionResponse::Select(Segment::new(0, 1, GENESIS_ROOT, root(2)))
        );
    }

    #[tokio::test]
    async fn resolved_games_report_their_status() {
        let solver = BisectionSolver::defender(honest(), DEFENDER);
        let mut game = Challenge::new(1, 0, CHALLENGER, DEFENDER, root(1), 1, 0);
        game.resolve(root(1));
        assert_eq!(
            solver.respond(&game).await.unwrap(),
            BisectionResponse::Resolved(GameStatus::DefenderWins)
        );
    }

    #[tokio::test]
    async fn challenge_decision() {
        let solver = BisectionSolver::challenger(honest(), CHALLENGER);
        assert!(!solver.should_challenge(root(13)).await.unwrap());
        assert!(solver.should_challenge(root(14)).await.unwrap());

        let faulty = BisectionSolver::challenger(FaultyTraceProvider::new(honest(), 3), CHALLENGER);
        assert!(faulty.should_challenge(root(13)).await.unwrap());
    }
}
