//! This module contains the implementation of the [crate::TraceProvider] trait for honestly re-executing a batch.

use crate::{Batch, StepOracle, TraceProvider, GENESIS_ROOT};
use alloy_primitives::Bytes;
use anyhow::{anyhow, Result};
use thrain_primitives::Claim;

/// The [ExecutionTraceProvider] is a [TraceProvider] that replays a batch through a [StepOracle] once, up front,
/// and serves every prefix commitment from memory.
#[derive(Debug, Clone)]
pub struct ExecutionTraceProvider {
    /// `trace[i]` commits to the state after the first `i` transactions. `trace[0]` is the absolute prestate.
    trace: Vec<Claim>,
}

impl ExecutionTraceProvider {
    /// Replays `transactions` from the [GENESIS_ROOT].
    pub fn new<O: StepOracle>(oracle: &O, transactions: &[Bytes]) -> Self {
        let mut trace = Vec::with_capacity(transactions.len() + 1);
        trace.push(GENESIS_ROOT);
        for transaction in transactions {
            let pre_state = trace[trace.len() - 1];
            trace.push(oracle.step(pre_state, transaction));
        }
        Self { trace }
    }

    /// Replays a stored [Batch].
    pub fn from_batch<O: StepOracle>(oracle: &O, batch: &Batch) -> Self {
        Self::new(oracle, &batch.transactions)
    }

    /// Returns the commitment after the whole batch.
    pub fn final_root(&self) -> Claim {
        self.trace[self.trace.len() - 1]
    }
}

#[async_trait::async_trait]
impl TraceProvider for ExecutionTraceProvider {
    async fn absolute_prestate_hash(&self) -> Result<Claim> {
        Ok(self.trace[0])
    }

    async fn state_hash(&self, index: u64) -> Result<Claim> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.trace.get(i))
            .copied()
            .ok_or_else(|| {
                anyhow!(
                    "trace index {index} is past the end of a {} transaction batch",
                    self.transaction_count()
                )
            })
    }

    fn transaction_count(&self) -> u64 {
        (self.trace.len() - 1) as u64
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{commitment, ArithmeticOracle, Operation};
    use alloy_primitives::U256;

    #[tokio::test]
    async fn execution_trace() {
        let transactions = [
            Operation::add(10).encode(),
            Operation::multiply(2).encode(),
            Operation::add(5).encode(),
        ];
        let provider = ExecutionTraceProvider::new(&ArithmeticOracle, &transactions);

        assert_eq!(provider.transaction_count(), 3);
        assert_eq!(provider.absolute_prestate_hash().await.unwrap(), GENESIS_ROOT);
        for (index, expected) in [0u64, 10, 20, 25].into_iter().enumerate() {
            assert_eq!(
                provider.state_hash(index as u64).await.unwrap(),
                commitment(U256::from(expected))
            );
        }
        assert_eq!(provider.final_root(), commitment(U256::from(25)));
        assert!(provider.state_hash(4).await.is_err());
    }

    #[tokio::test]
    async fn replays_a_stored_batch() {
        let batch = Batch {
            index: 0,
            transactions: vec![Operation::add(7).encode(), Operation::multiply(3).encode()],
            claimed_root: commitment(U256::from(21)),
            submitted_at: 0,
            finalized: false,
        };
        let provider = ExecutionTraceProvider::from_batch(&ArithmeticOracle, &batch);

        assert_eq!(provider.final_root(), batch.claimed_root);
        assert_eq!(provider.state_hash(1).await.unwrap(), commitment(U256::from(7)));
    }
}
