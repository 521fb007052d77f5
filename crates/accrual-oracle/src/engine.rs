//! Builds and verifies successor registers.
//!
//! The engine owns no state. Every operation takes the committed register
//! by reference and returns a candidate successor; committing it is the
//! store's job.

use accrual_rate::fixed::FixedRateModel;
use accrual_rate::model::{AccrualContext, AccrualPolicy, RateModel};
use accrual_rate::polynomial::PolynomialRateModel;
use accrual_types::reference::ReferenceInputs;
use accrual_types::register::{AccrualDatum, ModelKind, ValueRegister};
use accrual_types::Height;

use crate::auth::{Approval, AuthorizationCheck, RateChangeRequest};
use crate::config::OracleConfig;
use crate::validator::TransitionValidator;
use crate::{OracleError, Result};

/// Periods due on a compound register at `current_height`.
///
/// Zero while the window is closed, one when exactly one period is due.
pub fn periods_behind(
    last_update_height: Height,
    current_height: Height,
    update_frequency: u64,
) -> u64 {
    if current_height < last_update_height || update_frequency == 0 {
        return 0;
    }
    (current_height - last_update_height) / update_frequency + 1
}

/// Accrual engine bound to one deployment.
#[derive(Debug, Clone)]
pub struct AccrualEngine {
    validator: TransitionValidator,
}

impl AccrualEngine {
    pub fn new(config: OracleConfig) -> Self {
        Self {
            validator: TransitionValidator::new(config),
        }
    }

    pub fn config(&self) -> &OracleConfig {
        self.validator.config()
    }

    pub fn validator(&self) -> &TransitionValidator {
        &self.validator
    }

    /// Successor datum the rate model derives from the reference inputs.
    fn next_datum(&self, current: &ValueRegister, refs: &ReferenceInputs) -> Result<AccrualDatum> {
        let model = RateModel::Polynomial(PolynomialRateModel::new(refs.parameters.coefficients));
        let context = AccrualContext::Period {
            pool: refs.pool,
            update_frequency: self.config().update_frequency,
        };
        Ok(model.compute_update(&current.datum, &context)?)
    }

    /// Advance a compound register by one period.
    ///
    /// `fee` is the execution fee drawn from the carried value.
    ///
    /// # Errors
    ///
    /// - [`OracleError::InvalidIdentifier`] if the register or a reference
    ///   input is not the configured one
    /// - [`OracleError::StaleUpdate`] if the window has not opened
    /// - [`OracleError::ExecutionFeeExceeded`] if `fee` is above the cap
    /// - [`OracleError::NonMonotonicValue`] if the parameters yield a rate
    ///   below par
    /// - rate model errors (`InvalidUtilization`, `NonPositiveRate`,
    ///   `OverflowRisk`)
    pub fn advance(
        &self,
        current: &ValueRegister,
        refs: &ReferenceInputs,
        current_height: Height,
        fee: u64,
    ) -> Result<ValueRegister> {
        self.validator.validate_inputs(current, refs, current_height)?;

        let datum = self.next_datum(current, refs)?;
        let successor = current.successor(datum, fee);
        self.validator
            .validate_compound(current, &successor, refs, current_height)?;

        if let Some(last) = current.last_update_height() {
            let behind = periods_behind(last, current_height, self.config().update_frequency);
            if behind > 1 {
                tracing::warn!(
                    token = %current.identity.token,
                    periods_behind = behind,
                    "register lags; catching up one period"
                );
            }
        }
        tracing::info!(
            token = %current.identity.token,
            version = successor.version,
            borrow_token_value = %successor.borrow_token_value(),
            last_update_height = successor.last_update_height(),
            "accrual period advanced"
        );
        Ok(successor)
    }

    /// Check an externally built successor.
    ///
    /// Runs every validator check, then requires the datum to equal the one
    /// derived here from the same inputs.
    pub fn verify(
        &self,
        current: &ValueRegister,
        proposed: &ValueRegister,
        refs: &ReferenceInputs,
        current_height: Height,
    ) -> Result<()> {
        self.validator
            .validate_compound(current, proposed, refs, current_height)?;

        let expected = self.next_datum(current, refs)?;
        if proposed.datum != expected {
            return Err(OracleError::UnexpectedValue {
                expected: expected.borrow_token_value(),
                proposed: proposed.borrow_token_value(),
            });
        }
        tracing::debug!(version = proposed.version, "proposed successor verified");
        Ok(())
    }

    /// Replace the annual rate of a simple register.
    ///
    /// # Errors
    ///
    /// - [`OracleError::ModelMismatch`] if the register is compound
    /// - [`OracleError::UnauthorizedRateChange`] if `auth` refuses
    /// - [`OracleError::RateOutOfBounds`] if `annual_rate` exceeds 100%
    pub fn change_rate(
        &self,
        current: &ValueRegister,
        annual_rate: u64,
        approvals: &[Approval],
        auth: &dyn AuthorizationCheck,
        fee: u64,
    ) -> Result<ValueRegister> {
        if current.kind() != ModelKind::Simple {
            return Err(OracleError::ModelMismatch {
                expected: ModelKind::Simple,
                actual: current.kind(),
            });
        }

        let request = RateChangeRequest {
            identity: current.identity,
            version: current.version,
            annual_rate,
        };
        if !auth.authorize(&request, approvals) {
            tracing::warn!(token = %current.identity.token, annual_rate, "rate change refused");
            return Err(OracleError::UnauthorizedRateChange);
        }

        let model = RateModel::Fixed(FixedRateModel {
            annual_rate: current.annual_rate().unwrap_or_default(),
        });
        let context = AccrualContext::RateChange { annual_rate };
        let datum = model.compute_update(&current.datum, &context)?;
        let successor = current.successor(datum, fee);
        self.validator.validate_rate_change(current, &successor)?;

        tracing::info!(
            token = %current.identity.token,
            version = successor.version,
            from = current.annual_rate(),
            to = annual_rate,
            "annual rate changed"
        );
        Ok(successor)
    }
}

#[cfg(test)]
mod tests {
    use accrual_types::coefficients::CoefficientSet;
    use accrual_types::identity::TokenId;
    use accrual_types::reference::{ParameterRecord, PoolSnapshot};
    use accrual_types::register::CompoundDatum;
    use accrual_types::{BORROW_TOKEN_DENOMINATION, RATE_DENOMINATION, U256};

    use proptest::prelude::*;

    use super::*;
    use crate::TimingViolation;

    fn config() -> OracleConfig {
        OracleConfig::from_seed(b"engine-tests")
    }

    fn refs(config: &OracleConfig, coefficients: CoefficientSet) -> ReferenceInputs {
        // 2500 borrowed at par against 7500 idle: 25% utilization
        ReferenceInputs {
            pool: PoolSnapshot {
                identity: config.pool_token,
                pool_assets: 7_500,
                borrow_tokens_circulating: 2_500,
            },
            parameters: ParameterRecord {
                identity: config.parameter_token,
                coefficients,
            },
        }
    }

    fn compound(config: &OracleConfig, height: Height) -> ValueRegister {
        ValueRegister::compound(
            config.register_identity(),
            3_000_000,
            U256::from(BORROW_TOKEN_DENOMINATION),
            height,
        )
        .expect("register")
    }

    fn simple(config: &OracleConfig) -> ValueRegister {
        ValueRegister::simple(config.register_identity(), 1_000_000, 150_000).expect("simple")
    }

    fn linear(b: i64) -> CoefficientSet {
        CoefficientSet([0, b, 0, 0, 0, 0])
    }

    #[test]
    fn test_advance_one_period() {
        let config = config();
        let engine = AccrualEngine::new(config.clone());
        let cur = compound(&config, 1_000);
        let next = engine
            .advance(&cur, &refs(&config, linear(10_000_000)), 1_000, 100_000)
            .expect("advance");
        assert_eq!(next.borrow_token_value(), U256::from(10_250_000_000_000_000u128));
        assert_eq!(next.last_update_height(), Some(1_120));
        assert_eq!(next.version, 1);
        assert_eq!(next.carried_value, 2_900_000);
    }

    #[test]
    fn test_advance_before_window_rejected() {
        let config = config();
        let engine = AccrualEngine::new(config.clone());
        let cur = compound(&config, 1_000);
        let err = engine
            .advance(&cur, &refs(&config, linear(10_000_000)), 999, 0)
            .expect_err("early");
        assert!(matches!(err, OracleError::StaleUpdate(TimingViolation::Early { .. })));
    }

    #[test]
    fn test_late_advance_moves_one_period() {
        let config = config();
        let engine = AccrualEngine::new(config.clone());
        let cur = compound(&config, 1_000);
        let next = engine
            .advance(&cur, &refs(&config, linear(10_000_000)), 1_000 + 5 * 120, 0)
            .expect("advance");
        assert_eq!(next.last_update_height(), Some(1_120));
    }

    #[test]
    fn test_impostor_parameters_rejected_before_rate_math() {
        let config = config();
        let engine = AccrualEngine::new(config.clone());
        let cur = compound(&config, 1_000);
        let mut refs = refs(&config, CoefficientSet([i64::MIN, 0, 0, 0, 0, 0]));
        refs.parameters.identity = TokenId([0xab; 32]);
        let err = engine.advance(&cur, &refs, 1_000, 0).expect_err("impostor");
        assert!(matches!(err, OracleError::InvalidIdentifier { what: "parameters", .. }));
    }

    #[test]
    fn test_below_par_rate_rejected_as_decrease() {
        let config = config();
        let engine = AccrualEngine::new(config.clone());
        let cur = compound(&config, 1_000);
        let err = engine
            .advance(&cur, &refs(&config, CoefficientSet([-1_000, 0, 0, 0, 0, 0])), 1_000, 0)
            .expect_err("below par");
        assert!(matches!(err, OracleError::NonMonotonicValue { .. }));
    }

    #[test]
    fn test_verify_accepts_matching_proposal() {
        let config = config();
        let engine = AccrualEngine::new(config.clone());
        let cur = compound(&config, 1_000);
        let refs = refs(&config, CoefficientSet::standard());
        let proposed = engine.advance(&cur, &refs, 1_000, 0).expect("advance");
        engine.verify(&cur, &proposed, &refs, 1_000).expect("verify");
    }

    #[test]
    fn test_verify_rejects_inflated_value() {
        let config = config();
        let engine = AccrualEngine::new(config.clone());
        let cur = compound(&config, 1_000);
        let refs = refs(&config, linear(10_000_000));
        let proposed = cur.successor(
            AccrualDatum::Compound(CompoundDatum {
                borrow_token_value: U256::from(BORROW_TOKEN_DENOMINATION * 2),
                last_update_height: 1_120,
            }),
            0,
        );
        let err = engine.verify(&cur, &proposed, &refs, 1_000).expect_err("inflated");
        assert_eq!(
            err,
            OracleError::UnexpectedValue {
                expected: U256::from(10_250_000_000_000_000u128),
                proposed: U256::from(BORROW_TOKEN_DENOMINATION * 2),
            }
        );
    }

    #[test]
    fn test_verify_rejects_wrong_height_as_stale() {
        let config = config();
        let engine = AccrualEngine::new(config.clone());
        let cur = compound(&config, 1_000);
        let refs = refs(&config, linear(10_000_000));
        let proposed = cur.successor(
            AccrualDatum::Compound(CompoundDatum {
                borrow_token_value: U256::from(10_250_000_000_000_000u128),
                last_update_height: 1_121,
            }),
            0,
        );
        let err = engine.verify(&cur, &proposed, &refs, 1_000).expect_err("height");
        assert!(matches!(err, OracleError::StaleUpdate(TimingViolation::PeriodMismatch { .. })));
    }

    #[test]
    fn test_change_rate_authorized() {
        let config = config();
        let engine = AccrualEngine::new(config.clone());
        let cur = simple(&config);
        let allow = |_: &RateChangeRequest, _: &[Approval]| true;
        let next = engine.change_rate(&cur, 90_000, &[], &allow, 0).expect("change");
        assert_eq!(next.annual_rate(), Some(90_000));
        assert_eq!(next.version, 1);
        assert_eq!(next.identity, cur.identity);
    }

    #[test]
    fn test_change_rate_refused() {
        let config = config();
        let engine = AccrualEngine::new(config.clone());
        let cur = simple(&config);
        let deny = |_: &RateChangeRequest, _: &[Approval]| false;
        let err = engine.change_rate(&cur, 90_000, &[], &deny, 0).expect_err("refused");
        assert_eq!(err, OracleError::UnauthorizedRateChange);
    }

    #[test]
    fn test_change_rate_bounds() {
        let config = config();
        let engine = AccrualEngine::new(config.clone());
        let cur = simple(&config);
        let allow = |_: &RateChangeRequest, _: &[Approval]| true;
        let err = engine
            .change_rate(&cur, RATE_DENOMINATION + 1, &[], &allow, 0)
            .expect_err("too high");
        assert!(matches!(err, OracleError::RateOutOfBounds { .. }));
    }

    #[test]
    fn test_change_rate_on_compound_rejected() {
        let config = config();
        let engine = AccrualEngine::new(config.clone());
        let cur = compound(&config, 0);
        let allow = |_: &RateChangeRequest, _: &[Approval]| true;
        let err = engine.change_rate(&cur, 1, &[], &allow, 0).expect_err("compound");
        assert!(matches!(err, OracleError::ModelMismatch { .. }));
    }

    #[test]
    fn test_periods_behind() {
        assert_eq!(periods_behind(1_000, 999, 120), 0);
        assert_eq!(periods_behind(1_000, 1_000, 120), 1);
        assert_eq!(periods_behind(1_000, 1_119, 120), 1);
        assert_eq!(periods_behind(1_000, 1_120, 120), 2);
    }

    proptest! {
        #[test]
        fn accepted_successor_never_decreases(
            pool_assets in 0u128..1_000_000_000,
            circulating in 0u128..1_000_000_000,
            lag in 0u64..10_000,
        ) {
            let config = config();
            let engine = AccrualEngine::new(config.clone());
            let cur = compound(&config, 1_000);
            let mut refs = refs(&config, CoefficientSet::standard());
            refs.pool.pool_assets = pool_assets;
            refs.pool.borrow_tokens_circulating = circulating;

            let next = engine.advance(&cur, &refs, 1_000 + lag, 0).expect("advance");
            prop_assert!(next.borrow_token_value() >= cur.borrow_token_value());
            prop_assert_eq!(next.last_update_height(), Some(1_120));
            prop_assert!(engine.verify(&cur, &next, &refs, 1_000 + lag).is_ok());
        }
    }
}
