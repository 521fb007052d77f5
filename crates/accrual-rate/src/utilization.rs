//! Pool utilization.
//!
//! ```text
//! borrowed    = borrow_tokens_circulating * recorded_value / BORROW_TOKEN_DENOMINATION
//! utilization = INTEREST_DENOMINATION * borrowed / (pool_assets + borrowed)
//! ```
//!
//! Both divisions truncate, and that truncation is the authoritative
//! rounding: nothing downstream re-rounds the result. An empty pool (no
//! assets, nothing borrowed) is treated as unutilized.

use accrual_types::reference::PoolSnapshot;
use accrual_types::{BORROW_TOKEN_DENOMINATION, INTEREST_DENOMINATION, U256};

use crate::{RateError, Result};

/// Currency currently lent out, derived from circulating borrow tokens.
pub fn borrowed_amount(borrow_tokens_circulating: u128, recorded_value: U256) -> Result<U256> {
    Ok(U256::from(borrow_tokens_circulating)
        .checked_mul(recorded_value)
        .ok_or(RateError::Overflow("borrowed_amount"))?
        / U256::from(BORROW_TOKEN_DENOMINATION))
}

/// Utilization scaled to `[0, INTEREST_DENOMINATION]`.
///
/// # Errors
///
/// - [`RateError::Overflow`] if an intermediate product exceeds 256 bits
pub fn utilization(
    borrow_tokens_circulating: u128,
    recorded_value: U256,
    pool_assets: u128,
) -> Result<u64> {
    let borrowed = borrowed_amount(borrow_tokens_circulating, recorded_value)?;
    let total = borrowed
        .checked_add(U256::from(pool_assets))
        .ok_or(RateError::Overflow("utilization"))?;
    if total.is_zero() {
        return Ok(0);
    }

    let scaled = U256::from(INTEREST_DENOMINATION)
        .checked_mul(borrowed)
        .ok_or(RateError::Overflow("utilization"))?
        / total;

    // borrowed <= total, so the quotient never exceeds INTEREST_DENOMINATION
    u64::try_from(scaled).map_err(|_| RateError::Overflow("utilization"))
}

/// Utilization of a pool snapshot at the register's recorded value.
pub fn utilization_of(pool: &PoolSnapshot, recorded_value: U256) -> Result<u64> {
    utilization(pool.borrow_tokens_circulating, recorded_value, pool.pool_assets)
}
