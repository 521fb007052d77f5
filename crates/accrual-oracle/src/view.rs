//! Read-only consumer access to a committed register.
//!
//! Pool and Collateral read the borrow-token value through this view and
//! convert with the shared formulas in [`accrual_types::conversion`]. Reads
//! never mutate; two reads of the same committed register agree.

use accrual_types::conversion;
use accrual_types::register::ValueRegister;
use accrual_types::{Height, U256};

use crate::engine::periods_behind;
use crate::Result;

/// Borrowed view over a committed register.
#[derive(Debug, Clone, Copy)]
pub struct RegisterView<'a> {
    register: &'a ValueRegister,
}

impl<'a> RegisterView<'a> {
    pub fn new(register: &'a ValueRegister) -> Self {
        Self { register }
    }

    pub fn borrow_token_value(&self) -> U256 {
        self.register.borrow_token_value()
    }

    pub fn last_update_height(&self) -> Option<Height> {
        self.register.last_update_height()
    }

    pub fn version(&self) -> u64 {
        self.register.version
    }

    /// Currency owed for `borrow_tokens` at the committed value.
    pub fn debt_amount(&self, borrow_tokens: u128) -> Result<u128> {
        Ok(conversion::debt_amount(borrow_tokens, self.borrow_token_value())?)
    }

    /// Borrow tokens issued for `currency_amount` at the committed value.
    pub fn borrow_token_amount(&self, currency_amount: u128) -> Result<u128> {
        Ok(conversion::borrow_token_amount(currency_amount, self.borrow_token_value())?)
    }

    /// Accrual periods due at `current_height`; zero for simple registers.
    pub fn periods_behind(&self, current_height: Height, update_frequency: u64) -> u64 {
        self.last_update_height()
            .map(|last| periods_behind(last, current_height, update_frequency))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use accrual_types::identity::{PolicyId, RecordIdentity, TokenId};
    use accrual_types::BORROW_TOKEN_DENOMINATION;

    use super::*;

    fn identity() -> RecordIdentity {
        RecordIdentity {
            token: TokenId([4; 32]),
            policy: PolicyId([5; 32]),
        }
    }

    #[test]
    fn test_conversions_at_accrued_value() {
        let value = U256::from(10_250_000_000_000_000u128);
        let reg = ValueRegister::compound(identity(), 0, value, 240).expect("register");
        let view = RegisterView::new(&reg);
        assert_eq!(view.debt_amount(1_000).expect("debt"), 1_025);
        assert_eq!(view.borrow_token_amount(1_025).expect("tokens"), 1_000);
        assert_eq!(view.last_update_height(), Some(240));
    }

    #[test]
    fn test_reads_are_idempotent() {
        let value = U256::from(BORROW_TOKEN_DENOMINATION + 7);
        let reg = ValueRegister::compound(identity(), 0, value, 0).expect("register");
        let view = RegisterView::new(&reg);
        assert_eq!(view.debt_amount(10).expect("a"), view.debt_amount(10).expect("b"));
        assert_eq!(view.borrow_token_value(), view.borrow_token_value());
    }

    #[test]
    fn test_simple_register_view() {
        let reg = ValueRegister::simple(identity(), 0, 150_000).expect("simple");
        let view = RegisterView::new(&reg);
        assert_eq!(view.debt_amount(500).expect("debt"), 500);
        assert_eq!(view.periods_behind(1_000_000, 120), 0);
    }
}
