//! Conversions between borrow tokens and pool currency.
//!
//! Pool and Collateral must implement these exactly as written here:
//!
//! ```text
//! debt_amount         = borrow_token_amount * borrow_token_value / BORROW_TOKEN_DENOMINATION
//! borrow_token_amount = currency_amount * BORROW_TOKEN_DENOMINATION / borrow_token_value
//! ```
//!
//! Both divisions truncate. A round trip loses at most one unit while the
//! value is at or above the denomination.

use crate::{Result, TypesError, BORROW_TOKEN_DENOMINATION, U256};

/// Currency owed for `borrow_tokens` at the given borrow-token value.
///
/// # Errors
///
/// - [`TypesError::Overflow`] if the product or result leaves range
pub fn debt_amount(borrow_tokens: u128, borrow_token_value: U256) -> Result<u128> {
    let debt = U256::from(borrow_tokens)
        .checked_mul(borrow_token_value)
        .ok_or(TypesError::Overflow("debt_amount"))?
        / U256::from(BORROW_TOKEN_DENOMINATION);
    u128::try_from(debt).map_err(|_| TypesError::Overflow("debt_amount"))
}

/// Borrow tokens corresponding to `currency_amount` at the given value.
///
/// # Errors
///
/// - [`TypesError::ZeroValue`] if `borrow_token_value` is zero
/// - [`TypesError::Overflow`] if the result does not fit in `u128`
pub fn borrow_token_amount(currency_amount: u128, borrow_token_value: U256) -> Result<u128> {
    if borrow_token_value.is_zero() {
        return Err(TypesError::ZeroValue);
    }
    let tokens = U256::from(currency_amount)
        .checked_mul(U256::from(BORROW_TOKEN_DENOMINATION))
        .ok_or(TypesError::Overflow("borrow_token_amount"))?
        / borrow_token_value;
    u128::try_from(tokens).map_err(|_| TypesError::Overflow("borrow_token_amount"))
}
