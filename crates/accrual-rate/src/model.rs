//! The rate model variant.
//!
//! Both models expose one operation, `compute_update`, which maps the
//! current datum and a transition context to a candidate successor datum.
//! New methodologies plug in as further variants.

use accrual_types::reference::PoolSnapshot;
use accrual_types::register::{AccrualDatum, CompoundDatum, ModelKind, SimpleDatum};
use serde::{Deserialize, Serialize};

use crate::fixed::FixedRateModel;
use crate::polynomial::PolynomialRateModel;
use crate::utilization::utilization_of;
use crate::{RateError, Result};

/// Inputs a transition supplies to the rate model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccrualContext {
    /// Advance a compound register by one period.
    Period {
        pool: PoolSnapshot,
        update_frequency: u64,
    },
    /// Replace the simple model's annual rate.
    RateChange { annual_rate: u64 },
}

impl AccrualContext {
    pub fn kind(&self) -> ModelKind {
        match self {
            AccrualContext::Period { .. } => ModelKind::Compound,
            AccrualContext::RateChange { .. } => ModelKind::Simple,
        }
    }
}

/// Computes a candidate successor datum.
pub trait AccrualPolicy {
    /// The model this policy implements.
    fn kind(&self) -> ModelKind;

    /// Candidate successor for `current` under `context`.
    fn compute_update(
        &self,
        current: &AccrualDatum,
        context: &AccrualContext,
    ) -> Result<AccrualDatum>;
}

/// Polymorphic rate model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RateModel {
    Polynomial(PolynomialRateModel),
    Fixed(FixedRateModel),
}

impl AccrualPolicy for PolynomialRateModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Compound
    }

    fn compute_update(
        &self,
        current: &AccrualDatum,
        context: &AccrualContext,
    ) -> Result<AccrualDatum> {
        let AccrualDatum::Compound(datum) = current else {
            return Err(mismatch(ModelKind::Compound, current.kind()));
        };
        let AccrualContext::Period {
            pool,
            update_frequency,
        } = context
        else {
            return Err(mismatch(ModelKind::Compound, context.kind()));
        };

        let utilization = utilization_of(pool, datum.borrow_token_value)?;
        let borrow_token_value = self.next_value(datum.borrow_token_value, utilization)?;
        let last_update_height = datum
            .last_update_height
            .checked_add(*update_frequency)
            .ok_or(RateError::Overflow("update height"))?;

        Ok(AccrualDatum::Compound(CompoundDatum {
            borrow_token_value,
            last_update_height,
        }))
    }
}

impl AccrualPolicy for FixedRateModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Simple
    }

    fn compute_update(
        &self,
        current: &AccrualDatum,
        context: &AccrualContext,
    ) -> Result<AccrualDatum> {
        if !matches!(current, AccrualDatum::Simple(_)) {
            return Err(mismatch(ModelKind::Simple, current.kind()));
        }
        let AccrualContext::RateChange { annual_rate } = context else {
            return Err(mismatch(ModelKind::Simple, context.kind()));
        };

        let next = FixedRateModel::new(*annual_rate)?;
        Ok(AccrualDatum::Simple(SimpleDatum {
            annual_rate: next.annual_rate,
        }))
    }
}

impl AccrualPolicy for RateModel {
    fn kind(&self) -> ModelKind {
        match self {
            RateModel::Polynomial(m) => m.kind(),
            RateModel::Fixed(m) => m.kind(),
        }
    }

    fn compute_update(
        &self,
        current: &AccrualDatum,
        context: &AccrualContext,
    ) -> Result<AccrualDatum> {
        match self {
            RateModel::Polynomial(m) => m.compute_update(current, context),
            RateModel::Fixed(m) => m.compute_update(current, context),
        }
    }
}

fn mismatch(expected: ModelKind, actual: ModelKind) -> RateError {
    RateError::ModelMismatch { expected, actual }
}

#[cfg(test)]
mod tests {
    use accrual_types::coefficients::CoefficientSet;
    use accrual_types::identity::TokenId;
    use accrual_types::{BORROW_TOKEN_DENOMINATION, U256, UPDATE_FREQUENCY};

    use super::*;

    fn pool(pool_assets: u128, borrow_tokens_circulating: u128) -> PoolSnapshot {
        PoolSnapshot {
            identity: TokenId([3; 32]),
            pool_assets,
            borrow_tokens_circulating,
        }
    }

    fn compound(value: u128, height: u64) -> AccrualDatum {
        AccrualDatum::Compound(CompoundDatum {
            borrow_token_value: U256::from(value),
            last_update_height: height,
        })
    }

    #[test]
    fn test_polynomial_update_advances_one_period() {
        let model = RateModel::Polynomial(PolynomialRateModel::new(CoefficientSet::new([
            0, 10_000_000, 0, 0, 0, 0,
        ])));
        let context = AccrualContext::Period {
            pool: pool(750, 250),
            update_frequency: UPDATE_FREQUENCY,
        };
        let next = model
            .compute_update(&compound(BORROW_TOKEN_DENOMINATION, 1_000), &context)
            .expect("update");
        assert_eq!(next, compound(10_250_000_000_000_000, 1_120));
    }

    #[test]
    fn test_polynomial_idle_pool_keeps_value_with_zero_base() {
        let model = PolynomialRateModel::new(CoefficientSet::new([0, 10_000_000, 0, 0, 0, 0]));
        let context = AccrualContext::Period {
            pool: pool(0, 0),
            update_frequency: UPDATE_FREQUENCY,
        };
        let next = model
            .compute_update(&compound(BORROW_TOKEN_DENOMINATION, 0), &context)
            .expect("update");
        assert_eq!(next, compound(BORROW_TOKEN_DENOMINATION, UPDATE_FREQUENCY));
    }

    #[test]
    fn test_fixed_update_replaces_rate() {
        let model = RateModel::Fixed(FixedRateModel::new(150_000).expect("model"));
        let current = AccrualDatum::Simple(SimpleDatum { annual_rate: 150_000 });
        let next = model
            .compute_update(&current, &AccrualContext::RateChange { annual_rate: 90_000 })
            .expect("update");
        assert_eq!(next, AccrualDatum::Simple(SimpleDatum { annual_rate: 90_000 }));
    }

    #[test]
    fn test_fixed_update_rejects_out_of_bounds_rate() {
        let model = FixedRateModel::new(0).expect("model");
        let current = AccrualDatum::Simple(SimpleDatum { annual_rate: 0 });
        let err = model
            .compute_update(&current, &AccrualContext::RateChange { annual_rate: 1_000_001 })
            .expect_err("rate");
        assert!(matches!(err, RateError::RateOutOfBounds { .. }));
    }

    #[test]
    fn test_model_mismatch() {
        let model = RateModel::Fixed(FixedRateModel::new(0).expect("model"));
        let context = AccrualContext::Period {
            pool: pool(1, 1),
            update_frequency: UPDATE_FREQUENCY,
        };
        let err = model
            .compute_update(&compound(BORROW_TOKEN_DENOMINATION, 0), &context)
            .expect_err("mismatch");
        assert_eq!(
            err,
            RateError::ModelMismatch {
                expected: ModelKind::Simple,
                actual: ModelKind::Compound
            }
        );
    }
}
