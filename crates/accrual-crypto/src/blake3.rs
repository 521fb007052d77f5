//! Domain-separated BLAKE3 hashing.
//!
//! Identifiers are derived with BLAKE3's key-derivation mode from a one-shot
//! seed (the analog of spending a unique output). The same seed under two
//! contexts never yields the same identifier.

use accrual_types::identity::{PolicyId, TokenId};

/// Key-derivation contexts, one per kind of derived value.
pub mod contexts {
    pub const INTEREST_TOKEN: &str = "Accrual v1 interest-token";
    pub const PARAMETER_TOKEN: &str = "Accrual v1 parameter-token";
    pub const POOL_TOKEN: &str = "Accrual v1 pool-token";
    pub const ACCESS_POLICY: &str = "Accrual v1 access-policy";
    pub const RATE_CHANGE: &str = "Accrual v1 rate-change";
}

/// Derive a key using BLAKE3's key derivation mode.
pub fn derive_key(context: &str, key_material: &[u8]) -> [u8; 32] {
    let mut hasher = ::blake3::Hasher::new_derive_key(context);
    hasher.update(key_material);
    *hasher.finalize().as_bytes()
}

/// Derive a token identifier from a one-shot mint seed.
pub fn derive_token_id(context: &str, seed: &[u8]) -> TokenId {
    TokenId(derive_key(context, seed))
}

/// Derive the access-policy hash for a validator script or rule set.
pub fn derive_policy_id(policy_source: &[u8]) -> PolicyId {
    PolicyId(derive_key(contexts::ACCESS_POLICY, policy_source))
}

/// Encode multiple dynamic fields as `LE32(len) || field` pairs.
pub fn encode_multi_field(fields: &[&[u8]]) -> Vec<u8> {
    let total_len: usize = fields.iter().map(|f| 4 + f.len()).sum();
    let mut output = Vec::with_capacity(total_len);
    for field in fields {
        output.extend_from_slice(&(field.len() as u32).to_le_bytes());
        output.extend_from_slice(field);
    }
    output
}
