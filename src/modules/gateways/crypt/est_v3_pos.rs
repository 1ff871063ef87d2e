use std::cmp::Ordering;

use super::{hashes_match, Crypt, HashAlgorithm};
use crate::core::{FieldMap, FieldMapExt, Result};
use crate::modules::accounts::Account;

/// Est hash scheme `ver3`.
///
/// Every field except `hash`, `encoding` and `countdown` takes part: keys
/// are sorted in case-insensitive natural order, values are escaped (`\` and
/// `|`), joined with `|`, then the escaped store key is appended. SHA-512,
/// base64.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstV3PosCrypt;

const EXCLUDED_KEYS: [&str; 3] = ["hash", "encoding", "countdown"];

impl EstV3PosCrypt {
    fn hash_string(fields: &FieldMap, store_key: &str) -> String {
        let mut entries: Vec<(&String, &String)> = fields
            .iter()
            .filter(|(k, _)| !EXCLUDED_KEYS.iter().any(|ex| k.eq_ignore_ascii_case(ex)))
            .collect();
        entries.sort_by(|(a, _), (b, _)| natural_cmp_ignore_case(a, b));

        let mut parts: Vec<String> = entries.into_iter().map(|(_, v)| escape(v)).collect();
        parts.push(escape(store_key));
        parts.join("|")
    }
}

impl Crypt for EstV3PosCrypt {
    fn hash_field(&self) -> &'static str {
        "hash"
    }

    fn create_3d_hash(&self, account: &Account, fields: &FieldMap) -> Result<String> {
        let store_key = account.require_store_key()?;
        Ok(HashAlgorithm::Sha512.digest_base64(&Self::hash_string(fields, store_key)))
    }

    fn check_3d_hash(&self, account: &Account, fields: &FieldMap) -> Result<bool> {
        let store_key = account.require_store_key()?;
        let Some(bank_hash) = fields.value_ignore_case("hash").filter(|h| !h.is_empty()) else {
            return Ok(false);
        };

        let actual = HashAlgorithm::Sha512.digest_base64(&Self::hash_string(fields, store_key));
        Ok(hashes_match(bank_hash, &actual))
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('|', "\\|")
}

/// Case-insensitive natural ordering: digit runs compare by numeric value
fn natural_cmp_ignore_case(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();

    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let run_a = take_digits(&mut a);
                let run_b = take_digits(&mut b);
                let ord = run_a
                    .trim_start_matches('0')
                    .len()
                    .cmp(&run_b.trim_start_matches('0').len())
                    .then_with(|| run_a.trim_start_matches('0').cmp(run_b.trim_start_matches('0')));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.to_ascii_lowercase().cmp(&y.to_ascii_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                a.next();
                b.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        run.push(c);
        chars.next();
    }
    run
}
