//! # accrual-rate
//!
//! Interest-rate computation for the borrow-token oracle.
//!
//! All value and coefficient arithmetic runs in 256-bit integers with
//! checked operations; an operation that would leave that domain is reported
//! as [`RateError::Overflow`] rather than wrapping or saturating.
//!
//! ## Modules
//!
//! - [`utilization`] — Pool utilization from pool assets and circulating borrow tokens
//! - [`polynomial`] — Compound model: degree-5 polynomial period rate
//! - [`fixed`] — Simple model: linear per-loan interest over a duration
//! - [`model`] — The `RateModel` variant and the `AccrualPolicy` trait

pub mod fixed;
pub mod model;
pub mod polynomial;
pub mod utilization;

use accrual_types::register::ModelKind;
use accrual_types::{Height, I256};

/// Error types for rate computations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RateError {
    /// Intermediate arithmetic would exceed 256 bits.
    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    /// Utilization outside `[0, INTEREST_DENOMINATION]`.
    #[error("utilization {0} outside [0, 100000000]")]
    InvalidUtilization(u64),

    /// The polynomial evaluated to zero or below.
    #[error("period rate {0} is not positive")]
    NonPositiveRate(I256),

    /// Loan origination height lies in the future.
    #[error("invalid duration: borrowed at {borrow_height}, current height {current_height}")]
    InvalidDuration {
        /// Height recorded at loan origination.
        borrow_height: Height,
        /// Current block height.
        current_height: Height,
    },

    /// Annual rate above 100%.
    #[error("annual rate {rate} exceeds {max}")]
    RateOutOfBounds {
        /// The rejected rate.
        rate: u64,
        /// Upper bound.
        max: u64,
    },

    /// The policy cannot act on this datum or context.
    #[error("model mismatch: expected {expected:?}, got {actual:?}")]
    ModelMismatch {
        /// Model the policy implements.
        expected: ModelKind,
        /// Model of the datum or context supplied.
        actual: ModelKind,
    },
}

/// Convenience result type for rate computations.
pub type Result<T> = std::result::Result<T, RateError>;
