use std::fmt;

/// Library-wide Result type
pub type Result<T> = std::result::Result<T, PosError>;

/// Main error type for gateway operations
#[derive(thiserror::Error, Debug)]
pub enum PosError {
    /// The bank's 3-D authentication hash did not verify
    #[error("3-D hash mismatch: {0}")]
    HashMismatch(String),

    /// A supported operation was given a transaction type the bank does not offer for it
    #[error("Unsupported transaction type: {0}")]
    UnsupportedTransactionType(String),

    /// The bank has no mapping for this operation at all
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// A canonical value (currency, card brand, language...) has no bank token
    #[error("Unmapped {kind} value: {value}")]
    UnmappedValue { kind: &'static str, value: String },

    /// Bank payload could not be decoded under any known wire format
    #[error("Unparsable response: {reason}")]
    UnparsableResponse { reason: String, raw: Vec<u8> },

    /// Required order, card or callback field is absent
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Lifecycle step invoked from a state that does not allow it
    #[error("Invalid transaction state transition: {from} -> {to}")]
    InvalidState { from: String, to: String },

    /// Validation errors for caller supplied data
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bank rejected a protocol step (not a payment decline)
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Network or HTTP level failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Request encoding errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

// Helper functions for common error scenarios
impl PosError {
    pub fn hash_mismatch(bank: impl fmt::Display) -> Self {
        PosError::HashMismatch(format!("hash verification failed for {}", bank))
    }

    pub fn unsupported_tx(msg: impl Into<String>) -> Self {
        PosError::UnsupportedTransactionType(msg.into())
    }

    pub fn not_implemented(msg: impl Into<String>) -> Self {
        PosError::NotImplemented(msg.into())
    }

    pub fn unmapped(kind: &'static str, value: impl fmt::Display) -> Self {
        PosError::UnmappedValue {
            kind,
            value: value.to_string(),
        }
    }

    pub fn unparsable(reason: impl Into<String>, raw: &[u8]) -> Self {
        PosError::UnparsableResponse {
            reason: reason.into(),
            raw: raw.to_vec(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        PosError::MissingField(field.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        PosError::Validation(msg.into())
    }

    pub fn gateway(msg: impl Into<String>) -> Self {
        PosError::Gateway(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        PosError::Transport(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        PosError::Serialization(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        PosError::Configuration(msg.into())
    }

    /// True when the failure happened on the wire, so the bank may or may not
    /// have processed the request. Callers must query status instead of retrying.
    pub fn is_payment_status_unknown(&self) -> bool {
        matches!(self, PosError::Transport(_) | PosError::HttpClient(_))
    }

    /// Original bank bytes for undecodable payloads
    pub fn raw_payload(&self) -> Option<&[u8]> {
        match self {
            PosError::UnparsableResponse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}
