//! # accrual-types
//!
//! Shared domain types for the borrow-token interest oracle.
//!
//! The constants in this crate are compiled identically into the oracle and
//! into every consumer (Pool, Collateral) that converts between borrow tokens
//! and pool currency.
//!
//! ## Modules
//!
//! - [`identity`] — Unique record identifiers and access policies
//! - [`register`] — The persisted oracle state (`ValueRegister`)
//! - [`coefficients`] — Governance coefficient set and presets
//! - [`reference`] — Read-only reference inputs (pool snapshot, parameters)
//! - [`conversion`] — Debt / borrow-token conversions used by consumers

pub mod coefficients;
pub mod conversion;
pub mod identity;
pub mod reference;
pub mod register;

pub use bnum::types::{I256, U256};

/// Block height.
pub type Height = u64;

/// Borrow-token value scale (10^16 = one pool-currency unit per borrow token).
pub const BORROW_TOKEN_DENOMINATION: u128 = 10_000_000_000_000_000;

/// Scale of utilization and period rates (10^8 = 100%).
pub const INTEREST_DENOMINATION: u64 = 100_000_000;

/// Scale of polynomial coefficients.
pub const COEFFICIENT_DENOMINATION: u64 = 100_000_000;

/// Scale of the simple model's annual rate (10^6 = 100%).
pub const RATE_DENOMINATION: u64 = 1_000_000;

/// Blocks between two compound accruals.
pub const UPDATE_FREQUENCY: u64 = 120;

/// Blocks per year used by the simple model.
pub const BLOCKS_PER_YEAR: u64 = 262_800;

/// Compound periods per year.
pub const PERIODS_PER_YEAR: u64 = BLOCKS_PER_YEAR / UPDATE_FREQUENCY;

/// Error types for shared domain operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypesError {
    /// Intermediate arithmetic left the 256-bit domain.
    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    /// A register was built with a zero borrow-token value.
    #[error("borrow-token value must be positive")]
    ZeroValue,

    /// Annual rate above 100%.
    #[error("annual rate {rate} exceeds {max}")]
    RateOutOfBounds {
        /// The rejected rate.
        rate: u64,
        /// Upper bound ([`RATE_DENOMINATION`]).
        max: u64,
    },

    /// Invalid hex-encoded identifier.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// Convenience result type for domain operations.
pub type Result<T> = std::result::Result<T, TypesError>;
