// Property tests for the bank hash schemes: any change to a signed field
// must break verification.

#[path = "../helpers/mod.rs"]
mod helpers;

use proptest::prelude::*;
use vpos::core::FieldMap;
use vpos::gateways::crypt::{EstPosCrypt, EstV3PosCrypt, InterPosCrypt, PayForPosCrypt};
use vpos::gateways::Crypt;
use vpos::PaymentModel;

const EST_V3_KEYS: [&str; 8] = [
    "clientid", "amount", "okurl", "failurl", "TranType", "Instalment", "currency", "rnd",
];

const HASH_PARAMS: [&str; 5] = ["clientid", "oid", "AuthCode", "ProcReturnCode", "Response"];

const INTER_POS_KEYS: [&str; 7] = [
    "OrderId",
    "PurchAmount",
    "OkUrl",
    "FailUrl",
    "TxnType",
    "InstallmentCount",
    "Rnd",
];

const EST_KEYS: [&str; 7] = ["oid", "amount", "okUrl", "failUrl", "islemtipi", "taksit", "rnd"];

const PAY_FOR_KEYS: [&str; 8] = [
    "MbrId",
    "OrderId",
    "PurchAmount",
    "OkUrl",
    "FailUrl",
    "TxnType",
    "InstallmentCount",
    "Rnd",
];

fn values(len: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-Za-z0-9|\\\\:.]{1,16}", len)
}

fn build(keys: &[&str], values: &[String]) -> FieldMap {
    keys.iter()
        .zip(values)
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

proptest! {
    #[test]
    fn test_est_v3_signed_form_verifies(values in values(EST_V3_KEYS.len())) {
        let account = helpers::est_v3_account(PaymentModel::ThreeDSecure);
        let crypt = EstV3PosCrypt;

        let mut fields = build(&EST_V3_KEYS, &values);
        let hash = crypt.create_3d_hash(&account, &fields).unwrap();
        fields.insert("HASH".to_string(), hash);

        prop_assert!(crypt.check_3d_hash(&account, &fields).unwrap());
    }

    #[test]
    fn test_est_v3_tampered_field_fails(
        values in values(EST_V3_KEYS.len()),
        index in 0..EST_V3_KEYS.len(),
        replacement in "[A-Za-z0-9|\\\\:.]{1,16}",
    ) {
        prop_assume!(values[index] != replacement);
        let account = helpers::est_v3_account(PaymentModel::ThreeDSecure);
        let crypt = EstV3PosCrypt;

        let mut fields = build(&EST_V3_KEYS, &values);
        let hash = crypt.create_3d_hash(&account, &fields).unwrap();
        fields.insert("HASH".to_string(), hash);
        fields.insert(EST_V3_KEYS[index].to_string(), replacement);

        prop_assert!(!crypt.check_3d_hash(&account, &fields).unwrap());
    }

    #[test]
    fn test_est_v3_mutated_hash_fails(
        values in values(EST_V3_KEYS.len()),
        position in any::<prop::sample::Index>(),
        replacement in "[A-Za-z0-9+/]",
    ) {
        let account = helpers::est_v3_account(PaymentModel::ThreeDSecure);
        let crypt = EstV3PosCrypt;

        let mut fields = build(&EST_V3_KEYS, &values);
        let hash = crypt.create_3d_hash(&account, &fields).unwrap();
        let i = position.index(hash.len());
        prop_assume!(hash[i..i + 1] != replacement);

        let mut mutated = hash.clone();
        mutated.replace_range(i..i + 1, &replacement);
        fields.insert("HASH".to_string(), mutated);

        prop_assert!(!crypt.check_3d_hash(&account, &fields).unwrap());
    }

    #[test]
    fn test_est_hash_params_tampered_value_fails(
        values in values(HASH_PARAMS.len()),
        index in 0..HASH_PARAMS.len(),
        replacement in "[A-Za-z0-9.]{1,16}",
        rewrite_echo in any::<bool>(),
    ) {
        prop_assume!(values[index] != replacement);
        let account = helpers::est_account(PaymentModel::ThreeDPay);
        let crypt = EstPosCrypt;

        let mut callback = helpers::sign_hash_params(
            build(&HASH_PARAMS, &values),
            &HASH_PARAMS,
            account.store_key().unwrap_or_default(),
        );
        prop_assert!(crypt.check_3d_hash(&account, &callback).unwrap());

        callback.insert(HASH_PARAMS[index].to_string(), replacement);
        if rewrite_echo {
            // a forger who also rewrites the echoed value still lacks the store key
            let echoed: String = HASH_PARAMS.iter().map(|k| callback[*k].clone()).collect();
            callback.insert("HASHPARAMSVAL".to_string(), echoed);
        }

        prop_assert!(!crypt.check_3d_hash(&account, &callback).unwrap());
    }

    #[test]
    fn test_inter_pos_form_hash_covers_every_field(
        values in values(INTER_POS_KEYS.len()),
        index in 0..INTER_POS_KEYS.len(),
        replacement in "[A-Za-z0-9.]{1,16}",
    ) {
        prop_assume!(values[index] != replacement);
        let account = helpers::inter_pos_account(PaymentModel::ThreeDSecure);
        let crypt = InterPosCrypt;

        let fields = build(&INTER_POS_KEYS, &values);
        let original = crypt.create_3d_hash(&account, &fields).unwrap();

        let mut tampered = fields.clone();
        tampered.insert(INTER_POS_KEYS[index].to_string(), replacement);

        prop_assert_ne!(original, crypt.create_3d_hash(&account, &tampered).unwrap());
    }
}

fn sha1_form_round_trip(
    crypt: &dyn Crypt,
    account: &vpos::Account,
    keys: &[&str],
    values: &[String],
    index: usize,
    replacement: String,
) -> Result<(), TestCaseError> {
    let mut form = build(keys, values);
    let hash = crypt.create_3d_hash(account, &form).unwrap();
    form.insert(crypt.hash_field().to_string(), hash);
    prop_assert!(crypt.check_3d_hash(account, &form).unwrap());
    // a signed form is never accepted as a bank post-back
    prop_assert!(!crypt.check_callback_hash(account, &form).unwrap());

    form.insert(keys[index % keys.len()].to_string(), replacement);
    prop_assert!(!crypt.check_3d_hash(account, &form).unwrap());
    Ok(())
}

proptest! {
    #[test]
    fn test_sha1_bank_forms_round_trip(
        values in values(PAY_FOR_KEYS.len()),
        index in 0..EST_KEYS.len(),
        replacement in "[#!~]{1,4}",
    ) {
        sha1_form_round_trip(
            &EstPosCrypt,
            &helpers::est_account(PaymentModel::ThreeDSecure),
            &EST_KEYS,
            &values,
            index,
            replacement.clone(),
        )?;
        sha1_form_round_trip(
            &InterPosCrypt,
            &helpers::inter_pos_account(PaymentModel::ThreeDSecure),
            &INTER_POS_KEYS,
            &values,
            index,
            replacement.clone(),
        )?;
        sha1_form_round_trip(
            &PayForPosCrypt,
            &helpers::pay_for_account(PaymentModel::ThreeDSecure),
            &PAY_FOR_KEYS,
            &values,
            index,
            replacement,
        )?;
    }
}

#[test]
fn test_hash_without_store_key_is_an_error() {
    let account = vpos::Account::new("akbank", "700655000200", "ISBANKAPI", "ISBANK07", PaymentModel::ThreeDSecure);
    let fields = build(&EST_V3_KEYS, &vec!["x".to_string(); EST_V3_KEYS.len()]);

    assert!(EstV3PosCrypt.create_3d_hash(&account, &fields).is_err());
    assert!(EstPosCrypt.check_3d_hash(&account, &fields).is_err());
}
