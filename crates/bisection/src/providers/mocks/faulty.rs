//! This module contains a [crate::TraceProvider] that diverges from an honest trace.

use crate::TraceProvider;
use anyhow::Result;
use thrain_primitives::Claim;

/// The [FaultyTraceProvider] wraps another [TraceProvider] and corrupts every commitment from `diverge_at` onward,
/// modelling a proposer whose execution went wrong at transaction `diverge_at - 1`.
pub struct FaultyTraceProvider<P: TraceProvider> {
    pub inner: P,
    pub diverge_at: u64,
}

impl<P: TraceProvider> FaultyTraceProvider<P> {
    pub fn new(inner: P, diverge_at: u64) -> Self {
        Self { inner, diverge_at }
    }
}

#[async_trait::async_trait]
impl<P: TraceProvider> TraceProvider for FaultyTraceProvider<P> {
    async fn absolute_prestate_hash(&self) -> Result<Claim> {
        self.inner.absolute_prestate_hash().await
    }

    async fn state_hash(&self, index: u64) -> Result<Claim> {
        let mut state_hash = self.inner.state_hash(index).await?;
        if index >= self.diverge_at {
            state_hash[31] ^= 0xff;
        }
        Ok(state_hash)
    }

    fn transaction_count(&self) -> u64 {
        self.inner.transaction_count()
    }
}
