//! This module contains the [ArithmeticOracle], a [StepOracle] over a single `uint256` of state.
//!
//! A transaction is the ABI parameter encoding of `(string kind, uint256 value)` and the state commitment is the
//! big-endian encoding of the state word. `"add"` and `"multiply"` wrap modulo 2^256. Payloads that do not decode,
//! or that name an unknown kind, leave the state untouched.

use crate::StepOracle;
use alloy_primitives::{Bytes, U256};
use alloy_sol_types::{sol, SolType};
use thrain_primitives::Claim;

type ArithmeticTransactionEncoding = sol! { tuple(string, uint256) };

/// Returns the commitment to the state word `value`.
pub fn commitment(value: U256) -> Claim {
    Claim::from(value.to_be_bytes::<32>())
}

/// An operation understood by the [ArithmeticOracle].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add(U256),
    Multiply(U256),
}

impl Operation {
    pub fn add(value: u64) -> Self {
        Operation::Add(U256::from(value))
    }

    pub fn multiply(value: u64) -> Self {
        Operation::Multiply(U256::from(value))
    }

    fn kind(&self) -> &'static str {
        match self {
            Operation::Add(_) => "add",
            Operation::Multiply(_) => "multiply",
        }
    }

    fn operand(&self) -> U256 {
        match self {
            Operation::Add(value) | Operation::Multiply(value) => *value,
        }
    }

    /// Encodes the operation as a transaction payload.
    pub fn encode(&self) -> Bytes {
        ArithmeticTransactionEncoding::abi_encode_params(&(self.kind().to_string(), self.operand()))
            .into()
    }

    /// Decodes a transaction payload. Returns [None] for malformed payloads and unknown kinds.
    pub fn decode(transaction: &[u8]) -> Option<Self> {
        let (kind, value) = ArithmeticTransactionEncoding::abi_decode_params(transaction, true).ok()?;
        match kind.as_str() {
            "add" => Some(Operation::Add(value)),
            "multiply" => Some(Operation::Multiply(value)),
            _ => None,
        }
    }

    /// Applies the operation to the state word.
    pub fn apply(&self, state: U256) -> U256 {
        match self {
            Operation::Add(value) => state.wrapping_add(*value),
            Operation::Multiply(value) => state.wrapping_mul(*value),
        }
    }
}

/// The [ArithmeticOracle] is the reference [StepOracle]. It carries no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArithmeticOracle;

impl StepOracle for ArithmeticOracle {
    fn step(&self, pre_state: Claim, transaction: &[u8]) -> Claim {
        let state = U256::from_be_bytes(pre_state.0);
        let post_state = Operation::decode(transaction).map_or(state, |op| op.apply(state));
        commitment(post_state)
    }
}
