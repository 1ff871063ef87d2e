use super::{check_hash_params, Crypt, HashAlgorithm};
use crate::core::{FieldMap, FieldMapExt, Result};
use crate::modules::accounts::Account;

/// Est (Payten/Asseco) hash scheme, version 1: SHA-1 over a fixed field order
#[derive(Debug, Clone, Copy, Default)]
pub struct EstPosCrypt;

const HASH_ORDER: [&str; 7] = ["oid", "amount", "okUrl", "failUrl", "islemtipi", "taksit", "rnd"];

impl Crypt for EstPosCrypt {
    fn hash_field(&self) -> &'static str {
        "hash"
    }

    fn create_3d_hash(&self, account: &Account, fields: &FieldMap) -> Result<String> {
        let store_key = account.require_store_key()?;

        let mut hash_str = String::from(account.client_id());
        for key in HASH_ORDER {
            hash_str.push_str(fields.value_or_empty(key));
        }
        hash_str.push_str(store_key);

        Ok(HashAlgorithm::Sha1.digest_base64(&hash_str))
    }

    fn check_3d_hash(&self, account: &Account, fields: &FieldMap) -> Result<bool> {
        account.require_store_key()?;
        if fields.value("HASHPARAMS").is_some() {
            return self.check_callback_hash(account, fields);
        }
        self.check_form_hash(account, fields)
    }

    fn check_callback_hash(&self, account: &Account, fields: &FieldMap) -> Result<bool> {
        let store_key = account.require_store_key()?;
        Ok(check_hash_params(HashAlgorithm::Sha1, store_key, fields, ':'))
    }
}
