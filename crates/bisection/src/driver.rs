//! This module contains [play_out], which plays a challenge to completion between two [BisectionSolver]s.

use crate::{
    BisectionResponse, BisectionSolver, ChallengeId, Clock, CommitmentStore, DisputeEngine,
    IdentityRegistry, StepOracle, TraceProvider,
};
use anyhow::{bail, Result};
use std::sync::Arc;
use thrain_primitives::{DisputeSolver, GameStatus, Role};
use tokio::sync::Mutex;
use tracing::debug;

/// Upper bound on the number of moves in a game. Every pair of moves strictly narrows the segment, so a batch of
/// `n` transactions resolves in fewer than `2n` moves; a game still running after this many moves is stuck.
const MAX_MOVES: usize = 256;

/// Alternates `defender` and `challenger` against the challenge until it is resolved.
///
/// ### Takes
/// - `engine`: The shared engine. The lock is only held to snapshot the challenge and to apply a move.
/// - `challenge_id`: The challenge to play.
/// - `defender`/`challenger`: The solvers playing each side, moving under their own identities.
///
/// ### Returns
/// - The final [GameStatus], or an error if a solver failed or a move was rejected.
pub async fn play_out<S, R, O, C, D, X>(
    engine: Arc<Mutex<DisputeEngine<S, R, O, C>>>,
    challenge_id: ChallengeId,
    defender: &BisectionSolver<D>,
    challenger: &BisectionSolver<X>,
) -> Result<GameStatus>
where
    S: CommitmentStore,
    R: IdentityRegistry,
    O: StepOracle,
    C: Clock,
    D: TraceProvider,
    X: TraceProvider,
{
    for _ in 0..MAX_MOVES {
        let game = engine.lock().await.challenge(challenge_id)?.clone();

        let response = match game.turn() {
            Role::Defender => defender.respond(&game).await?,
            Role::Challenger => challenger.respond(&game).await?,
        };
        debug!(challenge_id, turn = ?game.turn(), ?response, "solver responded");

        let mut guard = engine.lock().await;
        match response {
            BisectionResponse::Bisect { mid, mid_root } => {
                guard.bisect(challenge_id, defender.identity, mid, mid_root)?;
            }
            BisectionResponse::Select(segment) => {
                let status = guard.select_segment(
                    challenge_id,
                    challenger.identity,
                    segment.start,
                    segment.end,
                    (segment.start_root, segment.end_root),
                )?;
                if status.is_resolved() {
                    return Ok(status);
                }
            }
            BisectionResponse::Resolved(status) => return Ok(status),
            BisectionResponse::Wait => {
                bail!(
                    "the {:?} of challenge {challenge_id} declined to move on its turn",
                    game.turn()
                )
            }
        }
    }

    bail!("challenge {challenge_id} did not resolve within {MAX_MOVES} moves")
}
