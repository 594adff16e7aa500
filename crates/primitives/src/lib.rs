#![doc = include_str!("../README.md")]

//! Primitives for Thrain, a library for settling optimistic batch commitments
//! through an interactive bisection game.

mod dispute_game;
pub use dispute_game::{Claim, GameStatus, Role};

mod traits;
pub use traits::{DisputeGame, DisputeSolver};

pub mod rule;
