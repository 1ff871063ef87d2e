use super::{hashes_match, Crypt, HashAlgorithm};
use crate::core::{FieldMap, FieldMapExt, Result};
use crate::modules::accounts::Account;

/// PayFor (QNB Finansbank) hashes.
///
/// Outgoing forms hash the member id and form fields in a fixed order. The
/// bank's post-back carries `ResponseHash`, computed over the authentication
/// result fields instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayForPosCrypt;

const REQUEST_HASH_ORDER: [&str; 8] = [
    "MbrId",
    "OrderId",
    "PurchAmount",
    "OkUrl",
    "FailUrl",
    "TxnType",
    "InstallmentCount",
    "Rnd",
];

const RESPONSE_HASH_ORDER: [&str; 5] = ["OrderId", "AuthCode", "ProcReturnCode", "3DStatus", "ResponseRnd"];

impl Crypt for PayForPosCrypt {
    fn hash_field(&self) -> &'static str {
        "Hash"
    }

    fn create_3d_hash(&self, account: &Account, fields: &FieldMap) -> Result<String> {
        let store_key = account.require_store_key()?;

        let mut hash_str: String = REQUEST_HASH_ORDER
            .iter()
            .map(|key| fields.value_or_empty(key))
            .collect();
        hash_str.push_str(store_key);

        Ok(HashAlgorithm::Sha1.digest_base64(&hash_str))
    }

    fn check_3d_hash(&self, account: &Account, fields: &FieldMap) -> Result<bool> {
        account.require_store_key()?;
        if fields.value("ResponseHash").is_some() {
            return self.check_callback_hash(account, fields);
        }
        self.check_form_hash(account, fields)
    }

    fn check_callback_hash(&self, account: &Account, fields: &FieldMap) -> Result<bool> {
        let store_key = account.require_store_key()?;
        let Some(bank_hash) = fields.value("ResponseHash") else {
            return Ok(false);
        };

        let mut hash_str: String = RESPONSE_HASH_ORDER
            .iter()
            .map(|key| fields.value_or_empty(key))
            .collect();
        hash_str.push_str(account.username());
        hash_str.push_str(store_key);

        let actual = HashAlgorithm::Sha1.digest_base64(&hash_str);
        Ok(hashes_match(bank_hash, &actual))
    }
}
