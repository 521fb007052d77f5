//! Compound model: utilization-driven polynomial period rate.
//!
//! ```text
//! rate = ID + a·ID/CD + b·u/CD + c·u²/(CD·ID) + d·u³/(CD·ID²) + e·u⁴/(CD·ID³) + f·u⁵/(CD·ID⁴)
//! ```
//!
//! `u` is pre-scaled by `ID`. The sum is formed as a single fraction over
//! `CD·ID⁴` in signed 256-bit integers and truncated (toward zero) once, so
//! no term loses precision on its own. The result is applied per period as
//! `new = old · rate / ID`.
//!
//! Coefficients are not clamped. A curve that evaluates to zero or below is
//! rejected; a curve below `ID` is returned as-is and left to the transition
//! validator, which refuses any decrease of the borrow-token value.

use accrual_types::coefficients::{CoefficientSet, COEFFICIENT_COUNT};
use accrual_types::{COEFFICIENT_DENOMINATION, I256, INTEREST_DENOMINATION, PERIODS_PER_YEAR, U256};
use serde::{Deserialize, Serialize};

use crate::{RateError, Result};

/// Polynomial rate model bound to one coefficient set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolynomialRateModel {
    pub coefficients: CoefficientSet,
}

impl PolynomialRateModel {
    pub fn new(coefficients: CoefficientSet) -> Self {
        Self { coefficients }
    }

    /// Period rate at `utilization`, scaled by `INTEREST_DENOMINATION`.
    pub fn compute_period_rate(&self, utilization: u64) -> Result<u128> {
        compute_period_rate(utilization, &self.coefficients)
    }

    /// Borrow-token value after one period at `utilization`.
    pub fn next_value(&self, old_value: U256, utilization: u64) -> Result<U256> {
        let rate = self.compute_period_rate(utilization)?;
        let new_value = apply_period_rate(old_value, rate)?;
        tracing::debug!(utilization, rate, %old_value, %new_value, "period rate applied");
        Ok(new_value)
    }
}

/// Evaluate the period rate.
///
/// # Errors
///
/// - [`RateError::InvalidUtilization`] if `utilization > INTEREST_DENOMINATION`
/// - [`RateError::Overflow`] if an intermediate term exceeds 256 bits
/// - [`RateError::NonPositiveRate`] if the curve evaluates to zero or below
pub fn compute_period_rate(utilization: u64, coefficients: &CoefficientSet) -> Result<u128> {
    if utilization > INTEREST_DENOMINATION {
        return Err(RateError::InvalidUtilization(utilization));
    }

    let id = I256::from(INTEREST_DENOMINATION as i64);
    let u = I256::from(utilization as i64);
    let degree = (COEFFICIENT_COUNT - 1) as u32;

    // Σ c_k · u^k · ID^(5-k)
    let mut numerator = I256::ZERO;
    for (power, coefficient) in coefficients.iter().enumerate() {
        if coefficient == 0 {
            continue;
        }
        let power = power as u32;
        let term = I256::from(coefficient)
            .checked_mul(checked_pow(u, power)?)
            .ok_or(RateError::Overflow("polynomial term"))?
            .checked_mul(checked_pow(id, degree - power)?)
            .ok_or(RateError::Overflow("polynomial term"))?;
        numerator = numerator
            .checked_add(term)
            .ok_or(RateError::Overflow("polynomial sum"))?;
    }

    // CD · ID^4
    let denominator = I256::from(COEFFICIENT_DENOMINATION as i64)
        .checked_mul(checked_pow(id, degree - 1)?)
        .ok_or(RateError::Overflow("polynomial denominator"))?;

    let rate = id
        .checked_add(
            numerator
                .checked_div(denominator)
                .ok_or(RateError::Overflow("polynomial quotient"))?,
        )
        .ok_or(RateError::Overflow("polynomial rate"))?;

    if rate <= I256::ZERO {
        return Err(RateError::NonPositiveRate(rate));
    }

    let rate = u128::try_from(rate).map_err(|_| RateError::Overflow("polynomial rate"))?;
    tracing::trace!(utilization, rate, "period rate evaluated");
    Ok(rate)
}

/// `old_value · rate / INTEREST_DENOMINATION`, multiplying first.
pub fn apply_period_rate(old_value: U256, rate: u128) -> Result<U256> {
    Ok(old_value
        .checked_mul(U256::from(rate))
        .ok_or(RateError::Overflow("apply_period_rate"))?
        / U256::from(INTEREST_DENOMINATION))
}

/// Non-compounded yearly rate implied by a period rate, scaled by
/// `INTEREST_DENOMINATION`. Negative when the curve sits below par.
pub fn annualized(rate: u128) -> i128 {
    (rate as i128 - INTEREST_DENOMINATION as i128) * PERIODS_PER_YEAR as i128
}

fn checked_pow(base: I256, exp: u32) -> Result<I256> {
    base.checked_pow(exp).ok_or(RateError::Overflow("polynomial power"))
}
