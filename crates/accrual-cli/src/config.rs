//! Operator configuration file.
//!
//! Loaded from `--config`, else from `ACCRUAL_CONFIG`, else devnet defaults.

use std::path::{Path, PathBuf};

use accrual_oracle::config::OracleConfig;
use accrual_types::coefficients::{CoefficientSet, Preset};
use accrual_types::reference::{ParameterRecord, PoolSnapshot, ReferenceInputs};
use serde::{Deserialize, Serialize};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "ACCRUAL_CONFIG";

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Deployment identifiers and limits.
    #[serde(default)]
    pub oracle: OracleConfig,
    /// Pool snapshot used for simulation.
    #[serde(default)]
    pub pool: PoolConfig,
    /// Coefficient selection.
    #[serde(default)]
    pub parameters: ParametersConfig,
    /// Register minted for simulation.
    #[serde(default)]
    pub register: RegisterConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Pool balances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Unborrowed currency.
    #[serde(default = "default_pool_assets")]
    pub pool_assets: u64,
    /// Borrow tokens in circulation.
    #[serde(default = "default_borrow_tokens")]
    pub borrow_tokens_circulating: u64,
}

/// Either a named preset or explicit coefficients. Explicit wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParametersConfig {
    #[serde(default = "default_preset")]
    pub preset: Preset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coefficients: Option<CoefficientSet>,
}

/// Initial register state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterConfig {
    /// Value locked with the register.
    #[serde(default = "default_carried_value")]
    pub carried_value: u64,
    /// Height at which the first window opens.
    #[serde(default)]
    pub start_height: u64,
    /// Fee drawn per transition.
    #[serde(default)]
    pub execution_fee: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// "trace" | "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_pool_assets() -> u64 {
    750_000
}

fn default_borrow_tokens() -> u64 {
    250_000
}

fn default_preset() -> Preset {
    Preset::Standard
}

fn default_carried_value() -> u64 {
    2_000_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            pool_assets: default_pool_assets(),
            borrow_tokens_circulating: default_borrow_tokens(),
        }
    }
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            preset: default_preset(),
            coefficients: None,
        }
    }
}

impl Default for RegisterConfig {
    fn default() -> Self {
        Self {
            carried_value: default_carried_value(),
            start_height: 0,
            execution_fee: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ParametersConfig {
    pub fn coefficients(&self) -> CoefficientSet {
        self.coefficients
            .unwrap_or_else(|| CoefficientSet::from_preset(self.preset))
    }
}

impl CliConfig {
    /// Load from `path`, else from [`CONFIG_ENV`], else defaults.
    ///
    /// A path that was named explicitly must exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| anyhow::anyhow!("reading {}: {e}", path.display()))?;
                Self::parse(&content)?
            }
            None => Self::default(),
        };
        config.oracle.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reference inputs bound to the configured pool and parameter tokens.
    pub fn reference_inputs(&self) -> ReferenceInputs {
        ReferenceInputs {
            pool: PoolSnapshot {
                identity: self.oracle.pool_token,
                pool_assets: u128::from(self.pool.pool_assets),
                borrow_tokens_circulating: u128::from(self.pool.borrow_tokens_circulating),
            },
            parameters: ParameterRecord {
                identity: self.oracle.parameter_token,
                coefficients: self.parameters.coefficients(),
            },
        }
    }
}
