//! Read-only reference inputs consulted during a transition.
//!
//! Each record carries the identifier of the token it was minted with, so the
//! oracle can refuse data from an impostor pool or parameter record.

use serde::{Deserialize, Serialize};

use crate::coefficients::CoefficientSet;
use crate::identity::TokenId;

/// Snapshot of the lending pool's balances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    /// Pool token the snapshot was read from.
    pub identity: TokenId,
    /// Unborrowed currency held by the pool.
    pub pool_assets: u128,
    /// Borrow tokens currently in circulation.
    pub borrow_tokens_circulating: u128,
}

/// Governance parameter record holding the coefficient set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterRecord {
    /// Parameter token the record is bound to.
    pub identity: TokenId,
    pub coefficients: CoefficientSet,
}

/// Everything a compound transition reads but does not own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceInputs {
    pub pool: PoolSnapshot,
    pub parameters: ParameterRecord,
}
