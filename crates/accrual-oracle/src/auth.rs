//! Governance authorization for rate changes.
//!
//! The simple model's annual rate may only change when an injected
//! [`AuthorizationCheck`] accepts the request. The concrete scheme is a
//! deployment choice; [`MultisigAuthorization`] is the k-of-n Ed25519
//! implementation shipped here, and any `Fn(&RateChangeRequest, &[Approval]) -> bool`
//! works as well.

use std::collections::BTreeSet;

use accrual_crypto::blake3::{contexts, derive_key, encode_multi_field};
use accrual_crypto::ed25519::{Signature, VerifyingKey};
use accrual_types::identity::RecordIdentity;

use crate::{OracleError, Result};

/// What governance is asked to approve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateChangeRequest {
    /// Register being changed.
    pub identity: RecordIdentity,
    /// Version the change applies to; approvals cannot be replayed on a
    /// later version.
    pub version: u64,
    /// Requested annual rate.
    pub annual_rate: u64,
}

/// One keyholder's signature over a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approval {
    /// Index into the keyholder list.
    pub keyholder_index: u8,
    pub signature: Signature,
}

/// Capability deciding whether a rate change may proceed.
pub trait AuthorizationCheck {
    fn authorize(&self, request: &RateChangeRequest, approvals: &[Approval]) -> bool;
}

impl<F> AuthorizationCheck for F
where
    F: Fn(&RateChangeRequest, &[Approval]) -> bool,
{
    fn authorize(&self, request: &RateChangeRequest, approvals: &[Approval]) -> bool {
        self(request, approvals)
    }
}

impl RateChangeRequest {
    /// Domain-separated digest the keyholders sign.
    pub fn message(&self) -> [u8; 32] {
        let encoded = encode_multi_field(&[
            self.identity.token.as_bytes(),
            self.identity.policy.as_bytes(),
            &self.version.to_le_bytes(),
            &self.annual_rate.to_le_bytes(),
        ]);
        derive_key(contexts::RATE_CHANGE, &encoded)
    }
}

/// k-of-n Ed25519 multisig.
#[derive(Debug, Clone)]
pub struct MultisigAuthorization {
    keyholders: Vec<VerifyingKey>,
    threshold: usize,
}

impl MultisigAuthorization {
    /// # Errors
    ///
    /// - [`OracleError::InvalidConfig`] unless `1 <= threshold <= keyholders.len() <= 256`
    pub fn new(keyholders: Vec<VerifyingKey>, threshold: usize) -> Result<Self> {
        if threshold == 0 || threshold > keyholders.len() {
            return Err(OracleError::InvalidConfig(format!(
                "threshold {threshold} invalid for {} keyholders",
                keyholders.len()
            )));
        }
        if keyholders.len() > usize::from(u8::MAX) + 1 {
            return Err(OracleError::InvalidConfig("too many keyholders".to_string()));
        }
        Ok(Self {
            keyholders,
            threshold,
        })
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Number of distinct keyholders with a valid signature on `request`.
    pub fn valid_signers(&self, request: &RateChangeRequest, approvals: &[Approval]) -> usize {
        let message = request.message();
        let mut signers = BTreeSet::new();
        for approval in approvals {
            let Some(key) = self.keyholders.get(usize::from(approval.keyholder_index)) else {
                continue;
            };
            if key.verify(&message, &approval.signature).is_ok() {
                signers.insert(approval.keyholder_index);
            }
        }
        signers.len()
    }
}

impl AuthorizationCheck for MultisigAuthorization {
    fn authorize(&self, request: &RateChangeRequest, approvals: &[Approval]) -> bool {
        let signers = self.valid_signers(request, approvals);
        tracing::debug!(
            signers,
            threshold = self.threshold,
            annual_rate = request.annual_rate,
            "rate change approvals checked"
        );
        signers >= self.threshold
    }
}
