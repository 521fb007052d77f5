//! Single-instance register arena.
//!
//! Each register is addressed by its token and minted exactly once. Every
//! transition names the version it expects to replace and runs through the
//! accrual engine, so only a successor that passed the full validator is
//! ever installed, and only one successor can land on a given version.
//! Concurrent proposals for the same predecessor serialize with exactly one
//! winner; a rejected transition leaves the committed register untouched.

use std::collections::HashMap;

use accrual_types::identity::TokenId;
use accrual_types::reference::ReferenceInputs;
use accrual_types::register::{check_annual_rate, ValueRegister};
use accrual_types::{Height, TypesError};

use crate::auth::{Approval, AuthorizationCheck};
use crate::config::OracleConfig;
use crate::engine::AccrualEngine;
use crate::view::RegisterView;
use crate::{OracleError, Result};

/// Committed registers keyed by token.
#[derive(Debug)]
pub struct RegisterStore {
    engine: AccrualEngine,
    registers: HashMap<TokenId, ValueRegister>,
}

impl RegisterStore {
    pub fn new(config: OracleConfig) -> Self {
        Self {
            engine: AccrualEngine::new(config),
            registers: HashMap::new(),
        }
    }

    pub fn engine(&self) -> &AccrualEngine {
        &self.engine
    }

    /// Install a freshly built register.
    ///
    /// # Errors
    ///
    /// - [`OracleError::InvalidIdentifier`] if the register does not carry the
    ///   configured token and policy
    /// - [`OracleError::InvalidRegister`] if its value is zero
    /// - [`OracleError::RateOutOfBounds`] if a simple register's rate exceeds 100%
    /// - [`OracleError::AlreadyMinted`] if the token already has a register
    pub fn mint(&mut self, register: ValueRegister) -> Result<()> {
        let expected = self.engine.config().register_identity();
        if register.identity != expected {
            return Err(OracleError::InvalidIdentifier {
                what: "minted register",
                expected: expected.token.to_string(),
                actual: register.identity.token.to_string(),
            });
        }
        if register.borrow_token_value().is_zero() {
            return Err(TypesError::ZeroValue.into());
        }
        if let Some(rate) = register.annual_rate() {
            check_annual_rate(rate)?;
        }

        let token = register.identity.token;
        if self.registers.contains_key(&token) {
            return Err(OracleError::AlreadyMinted(token));
        }
        tracing::info!(token = %token, model = ?register.kind(), "register minted");
        self.registers.insert(token, register);
        Ok(())
    }

    /// Committed register for `token`.
    pub fn get(&self, token: &TokenId) -> Result<&ValueRegister> {
        self.registers
            .get(token)
            .ok_or(OracleError::UnknownRegister(*token))
    }

    /// Read-only consumer view of the committed register.
    pub fn view(&self, token: &TokenId) -> Result<RegisterView<'_>> {
        self.get(token).map(RegisterView::new)
    }

    /// Advance the register at `expected_version` by one accrual period.
    pub fn advance(
        &mut self,
        token: &TokenId,
        expected_version: u64,
        refs: &ReferenceInputs,
        current_height: Height,
        fee: u64,
    ) -> Result<&ValueRegister> {
        self.replace(token, expected_version, |engine, current| {
            engine.advance(current, refs, current_height, fee)
        })
    }

    /// Commit an externally built successor after verifying it against the
    /// value the rate model derives from the same inputs.
    pub fn propose(
        &mut self,
        token: &TokenId,
        expected_version: u64,
        proposed: ValueRegister,
        refs: &ReferenceInputs,
        current_height: Height,
    ) -> Result<&ValueRegister> {
        self.replace(token, expected_version, |engine, current| {
            engine.verify(current, &proposed, refs, current_height)?;
            Ok(proposed)
        })
    }

    /// Change the annual rate of a simple register under governance approval.
    pub fn change_rate(
        &mut self,
        token: &TokenId,
        expected_version: u64,
        annual_rate: u64,
        approvals: &[Approval],
        auth: &dyn AuthorizationCheck,
        fee: u64,
    ) -> Result<&ValueRegister> {
        self.replace(token, expected_version, |engine, current| {
            engine.change_rate(current, annual_rate, approvals, auth, fee)
        })
    }

    /// Replace the register at `expected_version` with the successor `build`
    /// derives from it. Nothing changes unless every check passes.
    fn replace<F>(
        &mut self,
        token: &TokenId,
        expected_version: u64,
        build: F,
    ) -> Result<&ValueRegister>
    where
        F: FnOnce(&AccrualEngine, &ValueRegister) -> Result<ValueRegister>,
    {
        let current = self.get(token)?;
        if current.version != expected_version {
            tracing::warn!(
                token = %token,
                expected_version,
                committed_version = current.version,
                "stale transition rejected"
            );
            return Err(OracleError::VersionConflict {
                expected: expected_version,
                actual: current.version,
            });
        }

        let successor = build(&self.engine, current)
            .and_then(|successor| {
                self.engine.validator().validate_successor(current, &successor)?;
                Ok(successor)
            })
            .inspect_err(|err| {
                tracing::warn!(
                    token = %token,
                    version = expected_version,
                    error = %err,
                    "transition rejected"
                );
            })?;

        self.registers.insert(*token, successor);
        self.get(token)
    }
}
