use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{Currency, FieldMap};
use crate::modules::accounts::PaymentModel;
use crate::modules::orders::TransactionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Approved,
    Declined,
    Error,
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseStatus::Approved => write!(f, "approved"),
            ResponseStatus::Declined => write!(f, "declined"),
            ResponseStatus::Error => write!(f, "error"),
        }
    }
}

/// Normalized bank answer.
///
/// `raw` passes the bank's fields through untouched; everything else is the
/// mapper's interpretation of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: ResponseStatus,
    pub order_id: Option<String>,
    /// Bank-assigned transaction id
    pub transaction_id: Option<String>,
    pub auth_code: Option<String>,
    pub ref_ret_num: Option<String>,
    pub proc_return_code: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub payment_model: Option<PaymentModel>,
    /// 3-D authentication result as reported by the bank
    pub md_status: Option<String>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub currency: Option<Currency>,
    pub amount: Option<Decimal>,
    /// History rows
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<FieldMap>,
    pub raw: FieldMap,
}

impl Response {
    pub fn new(status: ResponseStatus) -> Self {
        Self {
            status,
            order_id: None,
            transaction_id: None,
            auth_code: None,
            ref_ret_num: None,
            proc_return_code: None,
            transaction_type: None,
            payment_model: None,
            md_status: None,
            error_code: None,
            error_message: None,
            currency: None,
            amount: None,
            records: Vec::new(),
            raw: FieldMap::new(),
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == ResponseStatus::Approved
    }
}
