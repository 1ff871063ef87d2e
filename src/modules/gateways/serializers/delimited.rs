//! `key=value` pairs separated by `;;` or `;;;` (InterPos responses).

use super::{DecodedPayload, WireFormat};
use crate::core::FieldMap;

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-')
}

/// Splits on runs of two or more `;`; a lone `;` stays part of the value
fn segments(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b';' {
            i += 1;
            continue;
        }
        let run_end = bytes[i..]
            .iter()
            .position(|b| *b != b';')
            .map_or(bytes.len(), |len| i + len);
        if run_end - i >= 2 {
            out.push(&text[start..i]);
            start = run_end;
        }
        i = run_end;
    }
    out.push(&text[start..]);
    out
}

pub fn decode(text: &str) -> std::result::Result<DecodedPayload, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("empty payload".to_string());
    }

    let mut fields = FieldMap::new();
    for piece in segments(text).into_iter().filter(|p| !p.is_empty()) {
        let Some((key, value)) = piece.split_once('=') else {
            return Err(format!("segment '{}' is not a key=value pair", piece));
        };
        let key = key.trim();
        if !is_valid_key(key) {
            return Err(format!("invalid key '{}'", key));
        }
        fields.insert(key.to_string(), value.to_string());
    }

    Ok(DecodedPayload::new(WireFormat::Delimited, fields))
}
