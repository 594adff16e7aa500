//! The traits module contains traits used throughout the library.

use crate::{dispute_game::Claim, GameStatus};

/// The [DisputeGame] trait is the highest level trait in the library, describing
/// the state of a simple primitive dispute. It has several key properties:
///
/// - It houses a root [Claim], a 32 byte commitment, which is the claim being
///   disputed.
/// - It can exist in one of three states, as indicated by the [GameStatus] enum.
///     1. [GameStatus::InProgress] - The dispute game is still in progress.
///     2. [GameStatus::ChallengerWins] - The challenger of the root claim has won
///        the dispute game.
///     3. [GameStatus::DefenderWins] - The defender of the root claim has won the
///        dispute game.
/// - It is resolved by comparing a post-state [Claim], recomputed by a trusted
///   source of truth, against the claim the game narrowed down to.
pub trait DisputeGame {
    /// Returns the root claim of the dispute game. The root claim is a 32 byte
    /// commitment to what is being disputed.
    fn root_claim(&self) -> Claim;

    /// Returns the current status of the dispute game.
    fn status(&self) -> &GameStatus;

    /// Resolves the dispute game against the `post_state` recomputed by the game's
    /// source of truth, returning the [GameStatus] after resolution. A resolved game
    /// must keep its status on subsequent calls.
    fn resolve(&mut self, post_state: Claim) -> &GameStatus;
}

/// The [DisputeSolver] trait describes the base functionality of a solver for
/// a [DisputeGame].
#[async_trait::async_trait]
pub trait DisputeSolver<DG: DisputeGame + Sync, R> {
    /// Returns the response of the solver provided a [DisputeGame]. The consumer of
    /// the response is responsible for dispatching the action associated with it.
    async fn respond(&self, game: &DG) -> anyhow::Result<R>;
}
