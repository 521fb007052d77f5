//! Simple model: linear interest per loan.
//!
//! ```text
//! interest = principal · annual_rate · duration_blocks / (RATE_DENOMINATION · BLOCKS_PER_YEAR)
//! ```
//!
//! The division truncates, so fractional interest is forgiven in the
//! borrower's favour. Duration is measured from the loan's origination
//! height, which the Collateral component records; nothing here is stored in
//! the register.

use accrual_types::register::check_annual_rate;
use accrual_types::{Height, TypesError, BLOCKS_PER_YEAR, RATE_DENOMINATION, U256};
use serde::{Deserialize, Serialize};

use crate::{RateError, Result};

/// Fixed-rate model at a governance-set annual rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedRateModel {
    /// Annual rate scaled by [`RATE_DENOMINATION`].
    pub annual_rate: u64,
}

impl FixedRateModel {
    /// # Errors
    ///
    /// - [`RateError::RateOutOfBounds`] if `annual_rate` exceeds 100%
    pub fn new(annual_rate: u64) -> Result<Self> {
        validate_annual_rate(annual_rate)?;
        Ok(Self { annual_rate })
    }

    /// Interest accrued on `principal` between origination and now.
    pub fn interest_since(
        &self,
        principal: u128,
        borrow_height: Height,
        current_height: Height,
    ) -> Result<u128> {
        let duration = duration_between(borrow_height, current_height)?;
        compute_duration_interest(principal, self.annual_rate, duration)
    }

    /// Principal plus accrued interest.
    pub fn owed_amount(
        &self,
        principal: u128,
        borrow_height: Height,
        current_height: Height,
    ) -> Result<u128> {
        let interest = self.interest_since(principal, borrow_height, current_height)?;
        principal
            .checked_add(interest)
            .ok_or(RateError::Overflow("owed_amount"))
    }
}

/// Blocks elapsed since loan origination.
///
/// # Errors
///
/// - [`RateError::InvalidDuration`] if `borrow_height` is in the future
pub fn duration_between(borrow_height: Height, current_height: Height) -> Result<u64> {
    current_height
        .checked_sub(borrow_height)
        .ok_or(RateError::InvalidDuration {
            borrow_height,
            current_height,
        })
}

/// Interest over `duration_blocks` at `annual_rate`.
///
/// # Errors
///
/// - [`RateError::RateOutOfBounds`] if `annual_rate` exceeds 100%
/// - [`RateError::Overflow`] if the result does not fit in `u128`
pub fn compute_duration_interest(
    principal: u128,
    annual_rate: u64,
    duration_blocks: u64,
) -> Result<u128> {
    validate_annual_rate(annual_rate)?;

    let numerator = U256::from(principal)
        .checked_mul(U256::from(annual_rate))
        .and_then(|n| n.checked_mul(U256::from(duration_blocks)))
        .ok_or(RateError::Overflow("duration interest"))?;
    let denominator = U256::from(RATE_DENOMINATION) * U256::from(BLOCKS_PER_YEAR);

    u128::try_from(numerator / denominator).map_err(|_| RateError::Overflow("duration interest"))
}

fn validate_annual_rate(annual_rate: u64) -> Result<()> {
    check_annual_rate(annual_rate).map_err(|err| match err {
        TypesError::RateOutOfBounds { rate, max } => RateError::RateOutOfBounds { rate, max },
        _ => RateError::RateOutOfBounds {
            rate: annual_rate,
            max: RATE_DENOMINATION,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_year_at_fifteen_percent() {
        // 100 · 15% · 0.5y = 7.5, truncated to 7
        let half_year = BLOCKS_PER_YEAR / 2;
        let interest = compute_duration_interest(100, 150_000, half_year).expect("interest");
        assert_eq!(interest, 7);

        let model = FixedRateModel::new(150_000).expect("model");
        assert_eq!(model.owed_amount(100, 1_000, 1_000 + half_year).expect("owed"), 107);
    }

    #[test]
    fn test_full_year_full_rate_doubles() {
        let model = FixedRateModel::new(RATE_DENOMINATION).expect("model");
        assert_eq!(model.owed_amount(5_000, 0, BLOCKS_PER_YEAR).expect("owed"), 10_000);
    }

    #[test]
    fn test_zero_duration_and_zero_rate() {
        assert_eq!(compute_duration_interest(1_000_000, 150_000, 0).expect("interest"), 0);
        assert_eq!(compute_duration_interest(1_000_000, 0, BLOCKS_PER_YEAR).expect("interest"), 0);
    }

    #[test]
    fn test_future_origination_rejected() {
        let err = duration_between(500, 499).expect_err("future loan");
        assert_eq!(
            err,
            RateError::InvalidDuration {
                borrow_height: 500,
                current_height: 499
            }
        );
    }

    #[test]
    fn test_rate_above_hundred_percent_rejected() {
        assert!(FixedRateModel::new(RATE_DENOMINATION + 1).is_err());
        let err = compute_duration_interest(1, RATE_DENOMINATION + 1, 1).expect_err("rate");
        assert!(matches!(err, RateError::RateOutOfBounds { .. }));
    }

    #[test]
    fn test_large_principal_does_not_overflow() {
        let interest = compute_duration_interest(u128::MAX / 2, RATE_DENOMINATION, BLOCKS_PER_YEAR)
            .expect("interest");
        assert_eq!(interest, u128::MAX / 2);
    }
}
