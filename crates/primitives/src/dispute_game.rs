//! Types related to the [crate::DisputeGame] trait.

use alloy_primitives::B256;
use anyhow::{bail, Error};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// The [Claim] type is an alias to [B256], used to deliniate a state commitment from a regular hash.
pub type Claim = B256;

/// The [GameStatus] enum is used to indicate the status of a dispute game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// The [GameStatus::InProgress] variant is used to indicate that the dispute game is still in progress.
    InProgress = 0,
    /// The [GameStatus::ChallengerWins] variant is used to indicate that the challenger of the root claim has won the
    /// dispute game.
    ChallengerWins = 1,
    /// The [GameStatus::DefenderWins] variant is used to indicate that the defender of the root claim has won the
    /// dispute game.
    DefenderWins = 2,
}

impl GameStatus {
    /// Returns `true` once the game has reached a terminal status.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// Returns the winning [Role], if the game is resolved.
    pub fn winner(&self) -> Option<Role> {
        match self {
            GameStatus::InProgress => None,
            GameStatus::ChallengerWins => Some(Role::Challenger),
            GameStatus::DefenderWins => Some(Role::Defender),
        }
    }
}

impl TryFrom<u8> for GameStatus {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(GameStatus::InProgress),
            1 => Ok(GameStatus::ChallengerWins),
            2 => Ok(GameStatus::DefenderWins),
            _ => bail!("Invalid game status"),
        }
    }
}

/// The [Role] enum names the two sides of a dispute game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The [Role::Defender] is responsible for justifying the root claim. It proposes bisection midpoints.
    Defender = 0,
    /// The [Role::Challenger] disputes the root claim. It selects which sub-interval remains disputed.
    Challenger = 1,
}

impl Role {
    /// Returns the opposing [Role].
    pub fn opponent(&self) -> Self {
        match self {
            Role::Defender => Role::Challenger,
            Role::Challenger => Role::Defender,
        }
    }
}

impl TryFrom<u8> for Role {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Role::Defender),
            1 => Ok(Role::Challenger),
            _ => bail!("Invalid role"),
        }
    }
}
