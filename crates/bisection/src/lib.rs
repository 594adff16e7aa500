//! Optimistic batch commitments settled by an interactive bisection game.
//!
//! A proposer appends batches of opaque transactions together with a claimed post-state
//! [thrain_primitives::Claim] to a [CommitmentStore]. While a batch's challenge window is open,
//! any challenger may open a [Challenge] against it through the [DisputeEngine]. The defender and
//! the challenger then alternate moves, narrowing the disputed transaction interval until it
//! covers a single transaction, which the [StepOracle] re-executes to adjudicate the game.

extern crate thrain_primitives;

mod clock;
pub use clock::{Clock, ManualClock, SystemClock};

mod config;
pub use config::DisputeConfig;

mod driver;
pub use driver::play_out;

mod engine;
pub use engine::DisputeEngine;

mod error;
pub use error::DisputeError;

mod events;
pub use events::{Event, EventBus};

mod invalidation;
pub use invalidation::{Invalidation, InvalidationLog};

mod oracle;
pub use oracle::{commitment, ArithmeticOracle, Operation};

pub mod providers;

mod registry;
pub use registry::SubmitterRegistry;

mod solver;
pub use solver::BisectionSolver;

mod state;
pub use state::Challenge;

mod store;
pub use store::{Batch, MemoryCommitmentStore};

mod traits;
pub use traits::{CommitmentStore, IdentityRegistry, InvalidationHandler, StepOracle, TraceProvider};

mod types;
pub use types::{
    BatchIndex, BisectionResponse, ChallengeId, Identity, Phase, Segment, GENESIS_ROOT,
};
