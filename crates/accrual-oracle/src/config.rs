//! Deployment configuration.
//!
//! Identifiers are fixed at deployment and compiled into every consumer; the
//! fee cap and governance keyholders are deployment choices. Missing fields
//! fall back to devnet defaults derived from a fixed seed.

use accrual_crypto::blake3::{contexts, derive_policy_id, derive_token_id};
use accrual_crypto::ed25519::VerifyingKey;
use accrual_types::identity::{PolicyId, RecordIdentity, TokenId};
use accrual_types::UPDATE_FREQUENCY;
use serde::{Deserialize, Serialize};

use crate::auth::MultisigAuthorization;
use crate::{OracleError, Result};

/// Seed the devnet identifiers are derived from.
pub const DEVNET_SEED: &[u8] = b"accrual-devnet-genesis";

/// Oracle deployment parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Token bound to the value register.
    pub interest_token: TokenId,
    /// Token bound to the governance parameter record.
    pub parameter_token: TokenId,
    /// Token bound to the lending pool.
    pub pool_token: TokenId,
    /// Policy the register is locked under.
    pub access_policy: PolicyId,
    /// Largest draw on the register's carried value per transition.
    #[serde(default = "default_maximum_execution_fee")]
    pub maximum_execution_fee: u64,
    /// Blocks per compound period.
    #[serde(default = "default_update_frequency")]
    pub update_frequency: u64,
    #[serde(default)]
    pub governance: GovernanceConfig,
}

/// Keyholders allowed to change the simple model's rate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Hex-encoded Ed25519 public keys.
    #[serde(default)]
    pub keyholders: Vec<String>,
    /// Signatures required.
    #[serde(default)]
    pub threshold: usize,
}

fn default_maximum_execution_fee() -> u64 {
    1_000_000
}

fn default_update_frequency() -> u64 {
    UPDATE_FREQUENCY
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self::from_seed(DEVNET_SEED)
    }
}

impl OracleConfig {
    /// Derive every identifier from one genesis seed.
    pub fn from_seed(seed: &[u8]) -> Self {
        Self {
            interest_token: derive_token_id(contexts::INTEREST_TOKEN, seed),
            parameter_token: derive_token_id(contexts::PARAMETER_TOKEN, seed),
            pool_token: derive_token_id(contexts::POOL_TOKEN, seed),
            access_policy: derive_policy_id(seed),
            maximum_execution_fee: default_maximum_execution_fee(),
            update_frequency: default_update_frequency(),
            governance: GovernanceConfig::default(),
        }
    }

    /// Identity the register must carry.
    pub fn register_identity(&self) -> RecordIdentity {
        RecordIdentity {
            token: self.interest_token,
            policy: self.access_policy,
        }
    }

    /// # Errors
    ///
    /// - [`OracleError::InvalidConfig`] if the period is zero or the
    ///   governance section is unusable
    pub fn validate(&self) -> Result<()> {
        if self.update_frequency == 0 {
            return Err(OracleError::InvalidConfig(
                "update_frequency must be positive".to_string(),
            ));
        }
        if !self.governance.keyholders.is_empty() {
            self.governance.authorization()?;
        }
        Ok(())
    }
}

impl GovernanceConfig {
    /// Build the multisig capability from the configured keyholders.
    pub fn authorization(&self) -> Result<MultisigAuthorization> {
        let keys = self
            .keyholders
            .iter()
            .map(|k| {
                VerifyingKey::from_hex(k).map_err(|e| OracleError::InvalidConfig(e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        MultisigAuthorization::new(keys, self.threshold)
    }
}
