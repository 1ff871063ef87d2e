use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical transaction types; each bank maps these to its own token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    PayAuth,
    PayPreAuth,
    PayPostAuth,
    Cancel,
    Refund,
    Status,
    History,
}

impl TransactionType {
    /// Types that move funds as part of a payment
    pub fn is_payment(&self) -> bool {
        matches!(
            self,
            TransactionType::PayAuth | TransactionType::PayPreAuth | TransactionType::PayPostAuth
        )
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::PayAuth => write!(f, "pay"),
            TransactionType::PayPreAuth => write!(f, "pre"),
            TransactionType::PayPostAuth => write!(f, "post"),
            TransactionType::Cancel => write!(f, "cancel"),
            TransactionType::Refund => write!(f, "refund"),
            TransactionType::Status => write!(f, "status"),
            TransactionType::History => write!(f, "history"),
        }
    }
}
