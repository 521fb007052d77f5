//! # accrual-crypto
//!
//! Hashing and signature primitives for the interest oracle.
//!
//! ## Modules
//!
//! - [`blake3`] — Domain-separated BLAKE3 hashing and identifier derivation
//! - [`ed25519`] — Ed25519 signing and verification for governance keyholders

pub mod blake3;
pub mod ed25519;

/// Error types for cryptographic operations.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// Ed25519 signature verification failed.
    #[error("signature verification failed")]
    SignatureVerification,

    /// Invalid input data.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;
