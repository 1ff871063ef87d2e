//! Bank authentication hash schemes.
//!
//! Every bank signs its 3-D form fields and its 3-D callbacks with a digest
//! over a bank-defined field subset plus the merchant's store key. A `Crypt`
//! computes the outgoing hash and verifies the incoming one; comparisons go
//! through [`hashes_match`] so they run in constant time.

pub mod est_pos;
pub mod est_v3_pos;
pub mod inter_pos;
pub mod pay_flex_cp_v4_pos;
pub mod pay_for_pos;

use base64::prelude::*;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::core::{FieldMap, FieldMapExt, Result};
use crate::modules::accounts::Account;

pub use est_pos::EstPosCrypt;
pub use est_v3_pos::EstV3PosCrypt;
pub use inter_pos::InterPosCrypt;
pub use pay_flex_cp_v4_pos::PayFlexCpV4PosCrypt;
pub use pay_for_pos::PayForPosCrypt;

/// Length of the nonce placed in 3-D forms
pub const RANDOM_STRING_LENGTH: usize = 20;

/// Computes and verifies a bank's authentication hash
pub trait Crypt: Send + Sync {
    /// Key the hash is stored under in outgoing field maps
    fn hash_field(&self) -> &'static str;

    /// Hash over the bank's canonical subset of `fields`
    fn create_3d_hash(&self, account: &Account, fields: &FieldMap) -> Result<String>;

    /// Recompute the hash `fields` carry and compare. Accepts both bank
    /// callbacks and forms signed by [`Crypt::create_3d_hash`].
    fn check_3d_hash(&self, account: &Account, fields: &FieldMap) -> Result<bool>;

    /// Verification applied to 3-D post-backs before anything is mapped or
    /// confirmed. Banks whose callbacks are signed differently from the
    /// outgoing form accept only the callback signature here.
    fn check_callback_hash(&self, account: &Account, fields: &FieldMap) -> Result<bool> {
        self.check_3d_hash(account, fields)
    }

    /// Compares the form hash (`hash_field`) with a fresh `create_3d_hash`
    fn check_form_hash(&self, account: &Account, fields: &FieldMap) -> Result<bool> {
        let Some(form_hash) = fields.value(self.hash_field()) else {
            return Ok(false);
        };
        let expected = self.create_3d_hash(account, fields)?;
        Ok(hashes_match(form_hash, &expected))
    }

    /// Per-request nonce; unique, not a security token
    fn generate_random_string(&self) -> String {
        let mut random = Uuid::new_v4().simple().to_string();
        random.truncate(RANDOM_STRING_LENGTH);
        random
    }
}

/// Digest algorithms used by the supported banks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha1,
    Sha512,
}

impl HashAlgorithm {
    /// Base64 of the raw digest of `data`
    pub fn digest_base64(&self, data: &str) -> String {
        match self {
            HashAlgorithm::Sha1 => {
                let digest =
                    ring::digest::digest(&ring::digest::SHA1_FOR_LEGACY_USE_ONLY, data.as_bytes());
                BASE64_STANDARD.encode(digest.as_ref())
            }
            HashAlgorithm::Sha512 => {
                use sha2::{Digest, Sha512};

                BASE64_STANDARD.encode(Sha512::digest(data.as_bytes()))
            }
        }
    }
}

/// Constant-time string comparison
pub fn hashes_match(expected: &str, actual: &str) -> bool {
    expected.as_bytes().ct_eq(actual.as_bytes()).into()
}

/// Concatenation of the callback values named by `params_key` (e.g. `HASHPARAMS`)
///
/// Returns `None` when the callback does not list its hashed parameters.
pub fn hash_params_value(fields: &FieldMap, params_key: &str, separator: char) -> Option<String> {
    let params = fields.value(params_key)?;
    Some(
        params
            .split(separator)
            .filter(|p| !p.is_empty())
            .map(|p| fields.value_or_empty(p))
            .collect(),
    )
}

/// Verifies callbacks that list their hashed parameters (`HASHPARAMS`),
/// echo the concatenated values (`HASHPARAMSVAL`) and carry the digest (`HASH`).
pub(crate) fn check_hash_params(
    algorithm: HashAlgorithm,
    store_key: &str,
    fields: &FieldMap,
    separator: char,
) -> bool {
    let Some(params_value) = hash_params_value(fields, "HASHPARAMS", separator) else {
        return false;
    };
    let Some(bank_hash) = fields.value("HASH") else {
        return false;
    };
    if let Some(echoed) = fields.value("HASHPARAMSVAL") {
        if !hashes_match(echoed, &params_value) {
            return false;
        }
    }

    let actual = algorithm.digest_base64(&format!("{}{}", params_value, store_key));
    hashes_match(bank_hash, &actual)
}
