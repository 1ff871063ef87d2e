use super::{check_hash_params, Crypt, HashAlgorithm};
use crate::core::{FieldMap, FieldMapExt, Result};
use crate::modules::accounts::Account;

/// InterPos (Denizbank) hash: SHA-1 over the 3-D form fields in a fixed order
#[derive(Debug, Clone, Copy, Default)]
pub struct InterPosCrypt;

const HASH_ORDER: [&str; 7] = [
    "OrderId",
    "PurchAmount",
    "OkUrl",
    "FailUrl",
    "TxnType",
    "InstallmentCount",
    "Rnd",
];

impl Crypt for InterPosCrypt {
    fn hash_field(&self) -> &'static str {
        "Hash"
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
