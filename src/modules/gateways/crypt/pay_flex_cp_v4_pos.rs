use super::{Crypt, HashAlgorithm};
use crate::core::{FieldMap, FieldMapExt, PosError, Result};
use crate::modules::accounts::Account;

/// PayFlex common payment v4 (Vakifbank) registration hash.
///
/// The bank redirects back without a hash; the outcome is confirmed with a
/// status query instead, so there is nothing to verify here.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayFlexCpV4PosCrypt;

const HASH_SUFFIX: &str = "VakifBank";

impl Crypt for PayFlexCpV4PosCrypt {
    fn hash_field(&self) -> &'static str {
        "HashedData"
    }

    fn create_3d_hash(&self, account: &Account, fields: &FieldMap) -> Result<String> {
        let hash_str = format!(
            "{}{}{}{}{}",
            account.client_id(),
            fields.require("AmountCode")?,
            fields.require("Amount")?,
            account.password(),
            HASH_SUFFIX
        );
        Ok(HashAlgorithm::Sha512.digest_base64(&hash_str))
    }

    fn check_3d_hash(&self, _account: &Account, _fields: &FieldMap) -> Result<bool> {
        Err(PosError::not_implemented(
            "PayFlex common payment post-backs carry no hash",
        ))
    }
}
