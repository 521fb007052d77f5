//! Integration test: simple model and governance-gated rate changes.
//!
//! 1. Compute owed amounts at a fixed annual rate
//! 2. Change the rate with k-of-n keyholder approvals
//! 3. Check refused or replayed approvals leave the register intact

use accrual_crypto::ed25519::KeyPair;
use accrual_oracle::auth::{
    Approval, AuthorizationCheck, MultisigAuthorization, RateChangeRequest,
};
use accrual_oracle::config::OracleConfig;
use accrual_oracle::store::RegisterStore;
use accrual_oracle::OracleError;
use accrual_rate::fixed::{compute_duration_interest, FixedRateModel};
use accrual_rate::RateError;
use accrual_types::register::ValueRegister;
use accrual_types::{BLOCKS_PER_YEAR, BORROW_TOKEN_DENOMINATION, RATE_DENOMINATION, U256};

fn keyholders() -> Vec<KeyPair> {
    (1..=3u8).map(|i| KeyPair::from_bytes(&[i; 32])).collect()
}

fn sign(keys: &[KeyPair], indices: &[u8], request: &RateChangeRequest) -> Vec<Approval> {
    indices
        .iter()
        .map(|&i| Approval {
            keyholder_index: i,
            signature: keys[usize::from(i)].signing_key.sign(&request.message()),
        })
        .collect()
}

fn setup() -> (OracleConfig, RegisterStore, MultisigAuthorization, Vec<KeyPair>) {
    let config = OracleConfig::from_seed(b"simple-interest");
    let mut store = RegisterStore::new(config.clone());
    let register =
        ValueRegister::simple(config.register_identity(), 1_000_000, 150_000).expect("simple");
    store.mint(register).expect("mint");
    let keys = keyholders();
    let public = keys.iter().map(|k| k.verifying_key.clone()).collect();
    let auth = MultisigAuthorization::new(public, 2).expect("multisig");
    (config, store, auth, keys)
}

#[test]
fn half_year_at_fifteen_percent_truncates() {
    let interest = compute_duration_interest(100, 150_000, BLOCKS_PER_YEAR / 2).expect("interest");
    assert_eq!(interest, 7);

    let model = FixedRateModel::new(150_000).expect("model");
    assert_eq!(model.owed_amount(100, 1_000, 1_000 + BLOCKS_PER_YEAR / 2).expect("owed"), 107);
}

#[test]
fn full_year_at_full_rate_doubles() {
    let model = FixedRateModel::new(RATE_DENOMINATION).expect("model");
    assert_eq!(model.owed_amount(1_000, 0, BLOCKS_PER_YEAR).expect("owed"), 2_000);
}

#[test]
fn negative_duration_rejected() {
    let model = FixedRateModel::new(150_000).expect("model");
    let err = model.owed_amount(100, 500, 499).expect_err("negative");
    assert_eq!(
        err,
        RateError::InvalidDuration {
            borrow_height: 500,
            current_height: 499
        }
    );
}

#[test]
fn multisig_rate_change_commits() {
    let (config, mut store, auth, keys) = setup();
    let token = config.interest_token;

    let request = RateChangeRequest {
        identity: config.register_identity(),
        version: 0,
        annual_rate: 90_000,
    };
    let approvals = sign(&keys, &[0, 2], &request);
    let committed = store
        .change_rate(&token, 0, 90_000, &approvals, &auth, 1_000)
        .expect("change");

    assert_eq!(committed.annual_rate(), Some(90_000));
    assert_eq!(committed.version, 1);
    assert_eq!(committed.borrow_token_value(), U256::from(BORROW_TOKEN_DENOMINATION));
}

#[test]
fn single_signature_refused() {
    let (config, mut store, auth, keys) = setup();
    let token = config.interest_token;
    let before = store.get(&token).expect("get").clone();

    let request = RateChangeRequest {
        identity: config.register_identity(),
        version: 0,
        annual_rate: 90_000,
    };
    let approvals = sign(&keys, &[1], &request);
    let err = store
        .change_rate(&token, 0, 90_000, &approvals, &auth, 0)
        .expect_err("refused");
    assert_eq!(err, OracleError::UnauthorizedRateChange);
    assert_eq!(store.get(&token).expect("get"), &before);
}

#[test]
fn approvals_cannot_be_replayed_on_next_version() {
    let (config, mut store, auth, keys) = setup();
    let token = config.interest_token;

    let request = RateChangeRequest {
        identity: config.register_identity(),
        version: 0,
        annual_rate: 90_000,
    };
    let approvals = sign(&keys, &[0, 1], &request);
    store
        .change_rate(&token, 0, 90_000, &approvals, &auth, 0)
        .expect("first change");

    // same rate, same signatures, one version later
    assert!(!auth.authorize(
        &RateChangeRequest {
            version: 1,
            ..request
        },
        &approvals
    ));
    let err = store
        .change_rate(&token, 1, 90_000, &approvals, &auth, 0)
        .expect_err("replay");
    assert_eq!(err, OracleError::UnauthorizedRateChange);
}
