//! Mock implementations of the [crate::TraceProvider] trait for testing.

mod faulty;
pub use self::faulty::FaultyTraceProvider;
