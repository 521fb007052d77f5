//! # accrual-oracle
//!
//! The borrow-token interest oracle: a single register whose value grows
//! with accrued interest, advanced only through validated, all-or-nothing
//! transitions.
//!
//! A transition either passes every check and yields exactly one successor
//! register, or fails and leaves the committed register readable exactly as
//! before. Consumers (Pool, Collateral) only ever see committed state.
//!
//! ## Modules
//!
//! - [`config`] — Deployment parameters and expected identifiers
//! - [`auth`] — Governance authorization capability for rate changes
//! - [`validator`] — Invariant checks on a proposed transition
//! - [`engine`] — Builds and verifies successor registers
//! - [`store`] — Single-instance register arena with version-checked commits
//! - [`view`] — Read-only consumer access to a committed register

pub mod auth;
pub mod config;
pub mod engine;
pub mod store;
pub mod validator;
pub mod view;

use accrual_rate::RateError;
use accrual_types::identity::TokenId;
use accrual_types::register::ModelKind;
use accrual_types::{Height, TypesError, I256, U256};

/// Which timing rule a proposed compound transition broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingViolation {
    /// The accrual window has not opened yet.
    Early {
        /// Current block height.
        current_height: Height,
        /// Height at which the window opens.
        opens_at: Height,
    },
    /// The successor does not advance the height by exactly one period.
    PeriodMismatch {
        /// `last_update_height + update_frequency`.
        expected: Height,
        /// Height carried by the successor.
        proposed: Height,
    },
}

impl std::fmt::Display for TimingViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimingViolation::Early {
                current_height,
                opens_at,
            } => write!(f, "window opens at {opens_at}, current height {current_height}"),
            TimingViolation::PeriodMismatch { expected, proposed } => {
                write!(f, "successor height {proposed}, expected {expected}")
            }
        }
    }
}

/// Error types for oracle transitions.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OracleError {
    /// A record or reference input is not bound to the expected identifier.
    #[error("invalid identifier for {what}: expected {expected}, got {actual}")]
    InvalidIdentifier {
        /// Which record failed the check.
        what: &'static str,
        /// Expected identifier (hex).
        expected: String,
        /// Identifier carried by the record (hex).
        actual: String,
    },

    /// Height precondition not met.
    #[error("stale update: {0}")]
    StaleUpdate(TimingViolation),

    /// The successor's borrow-token value is below the current one.
    #[error("borrow-token value would decrease from {current} to {proposed}")]
    NonMonotonicValue {
        /// Committed value.
        current: U256,
        /// Proposed value.
        proposed: U256,
    },

    /// Intermediate arithmetic would leave the safe integer domain.
    #[error("overflow risk in {0}")]
    OverflowRisk(&'static str),

    /// The governance capability refused a rate change.
    #[error("rate change not authorized")]
    UnauthorizedRateChange,

    /// Elapsed time is negative.
    #[error("invalid duration: borrowed at {borrow_height}, current height {current_height}")]
    InvalidDuration {
        /// Height recorded at loan origination.
        borrow_height: Height,
        /// Current block height.
        current_height: Height,
    },

    /// The transition drew more than the maximum execution fee.
    #[error("carried value {successor} below {current} minus fee cap {max_fee}")]
    ExecutionFeeExceeded {
        /// Carried value of the committed register.
        current: u64,
        /// Carried value of the successor.
        successor: u64,
        /// Configured maximum execution fee.
        max_fee: u64,
    },

    /// The proposed value differs from the one the rate model yields.
    #[error("unexpected borrow-token value: expected {expected}, proposed {proposed}")]
    UnexpectedValue {
        /// Value computed from the reference inputs.
        expected: U256,
        /// Value carried by the proposal.
        proposed: U256,
    },

    /// The transition targets a different accrual model.
    #[error("model mismatch: expected {expected:?}, got {actual:?}")]
    ModelMismatch {
        /// Model of the committed register.
        expected: ModelKind,
        /// Model of the proposal or policy.
        actual: ModelKind,
    },

    /// The expected predecessor version is not the committed one.
    #[error("version conflict: expected {expected}, got {actual}")]
    VersionConflict {
        /// Version the caller expected.
        expected: u64,
        /// Version actually found.
        actual: u64,
    },

    /// Annual rate outside `[0, RATE_DENOMINATION]`.
    #[error("annual rate {rate} exceeds {max}")]
    RateOutOfBounds {
        /// The rejected rate.
        rate: u64,
        /// Upper bound.
        max: u64,
    },

    /// The polynomial evaluated to zero or below.
    #[error("period rate {0} is not positive")]
    NonPositiveRate(I256),

    /// Utilization outside `[0, INTEREST_DENOMINATION]`.
    #[error("utilization {0} out of range")]
    InvalidUtilization(u64),

    /// No register is minted under this identifier.
    #[error("no register for token {0}")]
    UnknownRegister(TokenId),

    /// A register is already minted under this identifier.
    #[error("token {0} already minted")]
    AlreadyMinted(TokenId),

    /// Deployment configuration is unusable.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A register failed construction checks.
    #[error("invalid register: {0}")]
    InvalidRegister(String),
}

impl From<RateError> for OracleError {
    fn from(err: RateError) -> Self {
        match err {
            RateError::Overflow(what) => OracleError::OverflowRisk(what),
            RateError::InvalidUtilization(u) => OracleError::InvalidUtilization(u),
            RateError::NonPositiveRate(rate) => OracleError::NonPositiveRate(rate),
            RateError::InvalidDuration {
                borrow_height,
                current_height,
            } => OracleError::InvalidDuration {
                borrow_height,
                current_height,
            },
            RateError::RateOutOfBounds { rate, max } => OracleError::RateOutOfBounds { rate, max },
            RateError::ModelMismatch { expected, actual } => {
                OracleError::ModelMismatch { expected, actual }
            }
        }
    }
}

impl From<TypesError> for OracleError {
    fn from(err: TypesError) -> Self {
        match err {
            TypesError::Overflow(what) => OracleError::OverflowRisk(what),
            TypesError::RateOutOfBounds { rate, max } => OracleError::RateOutOfBounds { rate, max },
            TypesError::ZeroValue | TypesError::InvalidIdentifier(_) => {
                OracleError::InvalidRegister(err.to_string())
            }
        }
    }
}

/// Convenience result type for oracle operations.
pub type Result<T> = std::result::Result<T, OracleError>;
