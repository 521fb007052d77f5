//! Integration test crate for the borrow-token interest oracle.
//!
//! This crate has no library code. Its tests drive registers through the
//! store, engine and validator together, the way Pool and Collateral see
//! them.
//!
//! ```sh
//! cargo test -p accrual-integration-tests
//! ```
