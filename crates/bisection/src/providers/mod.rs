//! This module contains [crate::TraceProvider]s: local views of a batch's execution trace used by participants to
//! decide their moves.

mod execution;
pub use self::execution::ExecutionTraceProvider;

pub mod mocks;
