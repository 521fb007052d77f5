//! Invariant checks on a proposed transition.
//!
//! Checks run in a fixed order and the first failure rejects the whole
//! transition:
//!
//! 1. identity (token and policy) unchanged, and the expected register
//! 2. carried value not drawn down by more than the execution-fee cap
//! 3. borrow-token value does not decrease
//! 4. reference inputs bound to their expected tokens
//! 5. height window open and successor advanced by exactly one period
//!
//! Version succession and model kind are checked alongside identity, and
//! the value must stay positive.

use accrual_types::identity::TokenId;
use accrual_types::reference::ReferenceInputs;
use accrual_types::register::{AccrualDatum, ModelKind, ValueRegister};
use accrual_types::{Height, TypesError, BORROW_TOKEN_DENOMINATION, U256};

use crate::config::OracleConfig;
use crate::{OracleError, Result, TimingViolation};

/// Validates transitions against the deployment configuration.
#[derive(Debug, Clone)]
pub struct TransitionValidator {
    config: OracleConfig,
}

impl TransitionValidator {
    pub fn new(config: OracleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    /// Validate a compound (periodic accrual) transition.
    pub fn validate_compound(
        &self,
        current: &ValueRegister,
        successor: &ValueRegister,
        refs: &ReferenceInputs,
        current_height: Height,
    ) -> Result<()> {
        self.validate_successor(current, successor)?;
        self.check_references(refs)?;
        self.check_timing(current, successor, current_height)
    }

    /// Checks every successor must pass whatever the model: identity,
    /// version, model kind, fee retention and a positive, non-decreasing
    /// value.
    pub fn validate_successor(
        &self,
        current: &ValueRegister,
        successor: &ValueRegister,
    ) -> Result<()> {
        self.check_identity(current, successor)?;
        self.check_retention(current, successor)?;
        check_monotonic(current, successor)
    }

    /// Checks that need no successor: the register is the configured one,
    /// follows the compound model, the references are genuine and the
    /// window is open.
    pub fn validate_inputs(
        &self,
        current: &ValueRegister,
        refs: &ReferenceInputs,
        current_height: Height,
    ) -> Result<()> {
        expect_token("interest token", self.config.interest_token, current.identity.token)?;
        let AccrualDatum::Compound(now) = &current.datum else {
            return Err(OracleError::ModelMismatch {
                expected: ModelKind::Compound,
                actual: current.kind(),
            });
        };
        self.check_references(refs)?;
        if current_height < now.last_update_height {
            return Err(OracleError::StaleUpdate(TimingViolation::Early {
                current_height,
                opens_at: now.last_update_height,
            }));
        }
        Ok(())
    }

    /// Validate a simple-model rate change.
    pub fn validate_rate_change(
        &self,
        current: &ValueRegister,
        successor: &ValueRegister,
    ) -> Result<()> {
        self.validate_successor(current, successor)?;
        let fixed = U256::from(BORROW_TOKEN_DENOMINATION);
        if successor.borrow_token_value() != fixed {
            return Err(OracleError::UnexpectedValue {
                expected: fixed,
                proposed: successor.borrow_token_value(),
            });
        }
        Ok(())
    }

    fn check_identity(&self, current: &ValueRegister, successor: &ValueRegister) -> Result<()> {
        expect_token("interest token", self.config.interest_token, current.identity.token)?;
        expect_token("successor token", current.identity.token, successor.identity.token)?;
        if successor.identity.policy != current.identity.policy {
            return Err(OracleError::InvalidIdentifier {
                what: "access policy",
                expected: current.identity.policy.to_string(),
                actual: successor.identity.policy.to_string(),
            });
        }
        if successor.kind() != current.kind() {
            return Err(OracleError::ModelMismatch {
                expected: current.kind(),
                actual: successor.kind(),
            });
        }
        let next_version = current.version.wrapping_add(1);
        if successor.version != next_version {
            return Err(OracleError::VersionConflict {
                expected: next_version,
                actual: successor.version,
            });
        }
        Ok(())
    }

    fn check_retention(&self, current: &ValueRegister, successor: &ValueRegister) -> Result<()> {
        let max_fee = self.config.maximum_execution_fee;
        if successor.carried_value < current.carried_value.saturating_sub(max_fee) {
            return Err(OracleError::ExecutionFeeExceeded {
                current: current.carried_value,
                successor: successor.carried_value,
                max_fee,
            });
        }
        Ok(())
    }

    fn check_references(&self, refs: &ReferenceInputs) -> Result<()> {
        expect_token("pool", self.config.pool_token, refs.pool.identity)?;
        expect_token("parameters", self.config.parameter_token, refs.parameters.identity)
    }

    fn check_timing(
        &self,
        current: &ValueRegister,
        successor: &ValueRegister,
        current_height: Height,
    ) -> Result<()> {
        let (AccrualDatum::Compound(now), AccrualDatum::Compound(next)) =
            (&current.datum, &successor.datum)
        else {
            return Err(OracleError::ModelMismatch {
                expected: ModelKind::Compound,
                actual: current.kind(),
            });
        };

        if current_height < now.last_update_height {
            return Err(OracleError::StaleUpdate(TimingViolation::Early {
                current_height,
                opens_at: now.last_update_height,
            }));
        }

        let expected = now
            .last_update_height
            .checked_add(self.config.update_frequency)
            .ok_or(OracleError::OverflowRisk("update height"))?;
        if next.last_update_height != expected {
            return Err(OracleError::StaleUpdate(TimingViolation::PeriodMismatch {
                expected,
                proposed: next.last_update_height,
            }));
        }
        Ok(())
    }
}

fn check_monotonic(current: &ValueRegister, successor: &ValueRegister) -> Result<()> {
    let (now, next) = (current.borrow_token_value(), successor.borrow_token_value());
    if next.is_zero() {
        return Err(TypesError::ZeroValue.into());
    }
    if next < now {
        return Err(OracleError::NonMonotonicValue {
            current: now,
            proposed: next,
        });
    }
    Ok(())
}

fn expect_token(what: &'static str, expected: TokenId, actual: TokenId) -> Result<()> {
    if expected != actual {
        return Err(OracleError::InvalidIdentifier {
            what,
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}
