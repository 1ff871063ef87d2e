//! Wire formats.
//!
//! Requests leave as XML or form fields; responses come back as XML, JSON or
//! a `key=value` delimited format. Banks do not declare the response format
//! reliably, so decoding tries formats in a fixed priority order and reports
//! which one matched.

pub mod delimited;
pub mod est_pos;
pub mod inter_pos;
pub mod json;
pub mod pay_flex_cp_v4_pos;
pub mod pay_for_pos;
pub mod xml;

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::core::{FieldMap, PosError, Result};
use crate::modules::orders::TransactionType;

pub use est_pos::EstPosSerializer;
pub use inter_pos::InterPosSerializer;
pub use pay_flex_cp_v4_pos::PayFlexCpV4PosSerializer;
pub use pay_for_pos::PayForPosSerializer;

pub const CONTENT_TYPE_XML: &str = "text/xml; charset=UTF-8";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireFormat {
    Xml,
    Json,
    Delimited,
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireFormat::Xml => write!(f, "xml"),
            WireFormat::Json => write!(f, "json"),
            WireFormat::Delimited => write!(f, "delimited"),
        }
    }
}

/// Request body ready for the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRequest {
    pub content_type: &'static str,
    pub body: String,
}

/// Flattened bank payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedPayload {
    /// Format that produced the payload
    pub format: Option<WireFormat>,
    /// Scalar fields; nested elements use dotted keys
    pub fields: FieldMap,
    /// Row-shaped data (history listings)
    pub records: Vec<FieldMap>,
}

impl DecodedPayload {
    pub fn new(format: WireFormat, fields: FieldMap) -> Self {
        Self {
            format: Some(format),
            fields,
            records: Vec::new(),
        }
    }
}

pub trait Serializer: Send + Sync {
    fn encode(&self, data: &FieldMap, tx_type: Option<TransactionType>) -> Result<EncodedRequest>;

    fn decode(&self, raw: &[u8], tx_type: Option<TransactionType>) -> Result<DecodedPayload>;
}

/// Tries each format in order; the first successful parse wins
pub fn decode_chain(raw: &[u8], formats: &[WireFormat]) -> Result<DecodedPayload> {
    let text = decode_text(raw);
    let text = text.as_ref();

    let mut failures = Vec::with_capacity(formats.len());
    for format in formats {
        let attempt = match format {
            WireFormat::Xml => xml::decode(text),
            WireFormat::Json => json::decode(text),
            WireFormat::Delimited => delimited::decode(text),
        };
        match attempt {
            Ok(payload) => return Ok(payload),
            Err(reason) => failures.push(format!("{}: {}", format, reason)),
        }
    }

    Err(PosError::unparsable(failures.join("; "), raw))
}

/// Response bytes as text.
///
/// Bodies that are not UTF-8 are read in the charset their XML declaration
/// names, or ISO-8859-9 (Turkish) when they declare none.
pub fn decode_text(raw: &[u8]) -> Cow<'_, str> {
    if let Ok(text) = std::str::from_utf8(raw) {
        return Cow::Borrowed(text);
    }
    let encoding = declared_encoding(raw).unwrap_or(encoding_rs::WINDOWS_1254);
    encoding.decode_without_bom_handling(raw).0
}

/// Charset from `<?xml ... encoding="..."?>`
fn declared_encoding(raw: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(&raw[..raw.len().min(256)]);
    let start = head.find("<?xml")?;
    let prolog = &head[start..start + head[start..].find("?>")?];
    let rest = &prolog[prolog.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let label = rest[1..].split(quote).next()?;
    Encoding::for_label(label.as_bytes())
}

/// Strips `\r\n` and the indentation that follows it.
///
/// Some banks break lines inside element bodies, which would otherwise turn
/// empty elements into whitespace values.
pub fn normalize_line_breaks(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find("\r\n") {
        out.push_str(&rest[..pos]);
        rest = rest[pos + 2..].trim_start();
    }
    out.push_str(rest);
    out
}
