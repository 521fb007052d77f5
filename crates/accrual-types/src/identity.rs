//! Unique record identifiers.
//!
//! Every record the oracle touches is bound to a token minted exactly once
//! (the "interest NFT" for the register, a parameter token for the
//! coefficient record, a pool token for the pool snapshot). The register is
//! additionally locked under an access policy; both must survive every
//! transition unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::{Result, TypesError};

/// A 32-byte identifier of a once-minted token.
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(#[serde_as(as = "serde_with::hex::Hex")] pub [u8; 32]);

/// A 32-byte hash of the access-control policy guarding a record.
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyId(#[serde_as(as = "serde_with::hex::Hex")] pub [u8; 32]);

/// Identity of a register: its token and the policy that guards it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordIdentity {
    /// The once-minted token bound to the record.
    pub token: TokenId,
    /// The policy the record is locked under.
    pub policy: PolicyId,
}

macro_rules! impl_hex_id {
    ($name:ident) => {
        impl $name {
            /// Raw bytes of the identifier.
            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), hex::encode(&self.0[..8]))
            }
        }

        impl FromStr for $name {
            type Err = TypesError;

            fn from_str(s: &str) -> Result<Self> {
                let bytes =
                    hex::decode(s).map_err(|e| TypesError::InvalidIdentifier(e.to_string()))?;
                let arr: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
                    TypesError::InvalidIdentifier(format!("expected 32 bytes, got {}", v.len()))
                })?;
                Ok(Self(arr))
            }
        }
    };
}

impl_hex_id!(TokenId);
impl_hex_id!(PolicyId);
