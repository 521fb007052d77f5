//! The persisted oracle state.
//!
//! A `ValueRegister` is never edited in place. A transition consumes the
//! current register and produces a successor carrying the same identity and
//! the next version; the predecessor is retired.

use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::identity::RecordIdentity;
use crate::{Height, Result, TypesError, BORROW_TOKEN_DENOMINATION, RATE_DENOMINATION, U256};

/// State of the compound (utilization-driven) model.
#[serde_as]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundDatum {
    /// Value of one borrow token in pool currency, scaled by
    /// [`BORROW_TOKEN_DENOMINATION`].
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub borrow_token_value: U256,
    /// Height at which the next accrual window opens. Each accepted update
    /// moves it forward by exactly one period.
    pub last_update_height: Height,
}

/// State of the simple (per-loan linear) model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleDatum {
    /// Annual rate scaled by [`RATE_DENOMINATION`].
    pub annual_rate: u64,
}

/// The accrual model a register follows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum AccrualDatum {
    Compound(CompoundDatum),
    Simple(SimpleDatum),
}

/// Kind of accrual model, without its data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Compound,
    Simple,
}

/// The oracle's persisted record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRegister {
    /// Token and policy the record is bound to.
    pub identity: RecordIdentity,
    /// Value locked alongside the record, drawn down by execution fees.
    pub carried_value: u64,
    /// Version token; successors carry `version + 1`.
    pub version: u64,
    pub datum: AccrualDatum,
}

impl AccrualDatum {
    /// The model this datum belongs to.
    pub fn kind(&self) -> ModelKind {
        match self {
            AccrualDatum::Compound(_) => ModelKind::Compound,
            AccrualDatum::Simple(_) => ModelKind::Simple,
        }
    }

    /// Current borrow-token value. Fixed at the denomination (1:1) for the
    /// simple model.
    pub fn borrow_token_value(&self) -> U256 {
        match self {
            AccrualDatum::Compound(d) => d.borrow_token_value,
            AccrualDatum::Simple(_) => U256::from(BORROW_TOKEN_DENOMINATION),
        }
    }
}

impl ValueRegister {
    /// Build a version-0 compound register.
    ///
    /// # Errors
    ///
    /// - [`TypesError::ZeroValue`] if `borrow_token_value` is zero
    pub fn compound(
        identity: RecordIdentity,
        carried_value: u64,
        borrow_token_value: U256,
        last_update_height: Height,
    ) -> Result<Self> {
        if borrow_token_value.is_zero() {
            return Err(TypesError::ZeroValue);
        }
        Ok(Self {
            identity,
            carried_value,
            version: 0,
            datum: AccrualDatum::Compound(CompoundDatum {
                borrow_token_value,
                last_update_height,
            }),
        })
    }

    /// Build a version-0 simple register.
    ///
    /// # Errors
    ///
    /// - [`TypesError::RateOutOfBounds`] if `annual_rate` exceeds 100%
    pub fn simple(identity: RecordIdentity, carried_value: u64, annual_rate: u64) -> Result<Self> {
        check_annual_rate(annual_rate)?;
        Ok(Self {
            identity,
            carried_value,
            version: 0,
            datum: AccrualDatum::Simple(SimpleDatum { annual_rate }),
        })
    }

    /// Current borrow-token value.
    pub fn borrow_token_value(&self) -> U256 {
        self.datum.borrow_token_value()
    }

    /// Height of the accrual window; `None` for the simple model.
    pub fn last_update_height(&self) -> Option<Height> {
        match &self.datum {
            AccrualDatum::Compound(d) => Some(d.last_update_height),
            AccrualDatum::Simple(_) => None,
        }
    }

    /// Annual rate; `None` for the compound model.
    pub fn annual_rate(&self) -> Option<u64> {
        match &self.datum {
            AccrualDatum::Compound(_) => None,
            AccrualDatum::Simple(d) => Some(d.annual_rate),
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.datum.kind()
    }

    /// Successor with the same identity, the next version and a new datum.
    ///
    /// `fee` is deducted from the carried value, saturating at zero.
    pub fn successor(&self, datum: AccrualDatum, fee: u64) -> Self {
        Self {
            identity: self.identity,
            carried_value: self.carried_value.saturating_sub(fee),
            version: self.version.wrapping_add(1),
            datum,
        }
    }
}

/// Check an annual rate lies in `[0, RATE_DENOMINATION]`.
pub fn check_annual_rate(annual_rate: u64) -> Result<()> {
    if annual_rate > RATE_DENOMINATION {
        return Err(TypesError::RateOutOfBounds {
            rate: annual_rate,
            max: RATE_DENOMINATION,
        });
    }
    Ok(())
}
