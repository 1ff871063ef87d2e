use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{Currency, PosError, Result};
use crate::modules::accounts::Language;

/// Unit of a recurring payment's interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecurringFrequency {
    Day,
    Week,
    Month,
    Year,
}

impl std::fmt::Display for RecurringFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecurringFrequency::Day => write!(f, "DAY"),
            RecurringFrequency::Week => write!(f, "WEEK"),
            RecurringFrequency::Month => write!(f, "MONTH"),
            RecurringFrequency::Year => write!(f, "YEAR"),
        }
    }
}

/// Recurring payment plan, e.g. every 1 MONTH for 12 payments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringPlan {
    pub frequency: u32,
    pub frequency_type: RecurringFrequency,
    pub installment_count: u32,
}

/// Canonical order as the caller describes it.
///
/// Transient: built per call and never persisted. Each bank operation works
/// on a projection carrying only the fields that operation needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub installment: u32,
    pub ip: Option<String>,
    pub email: Option<String>,
    pub success_url: Option<String>,
    pub fail_url: Option<String>,
    pub lang: Option<Language>,
    pub recurring: Option<RecurringPlan>,
    /// Bank reference number of a prior transaction
    pub ref_ret_num: Option<String>,
    /// Bank transaction id of a prior transaction
    pub trans_id: Option<String>,
    /// Bank side order id, for banks that assign their own
    pub remote_order_id: Option<String>,
}

impl Order {
    pub fn new(id: impl Into<String>, amount: Decimal, currency: Currency) -> Self {
        Self {
            id: id.into(),
            amount: Some(amount),
            currency,
            ..Default::default()
        }
    }

    pub fn with_installment(mut self, installment: u32) -> Self {
        self.installment = installment;
        self
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_redirect_urls(
        mut self,
        success_url: impl Into<String>,
        fail_url: impl Into<String>,
    ) -> Self {
        self.success_url = Some(success_url.into());
        self.fail_url = Some(fail_url.into());
        self
    }

    pub fn with_lang(mut self, lang: Language) -> Self {
        self.lang = Some(lang);
        self
    }

    pub fn with_recurring(mut self, recurring: RecurringPlan) -> Self {
        self.recurring = Some(recurring);
        self
    }

    pub fn with_trans_id(mut self, trans_id: impl Into<String>) -> Self {
        self.trans_id = Some(trans_id.into());
        self
    }

    pub fn with_ref_ret_num(mut self, ref_ret_num: impl Into<String>) -> Self {
        self.ref_ret_num = Some(ref_ret_num.into());
        self
    }

    fn require_id(&self) -> Result<String> {
        if self.id.trim().is_empty() {
            return Err(PosError::missing_field("order id"));
        }
        Ok(self.id.clone())
    }

    fn require_amount(&self) -> Result<Decimal> {
        let amount = self.amount.ok_or_else(|| PosError::missing_field("amount"))?;
        if amount <= Decimal::ZERO {
            return Err(PosError::validation(format!(
                "amount must be positive, got {}",
                amount
            )));
        }
        Ok(amount)
    }

    /// Projection used for auth/pre-auth charges and 3-D forms
    pub fn to_payment(&self) -> Result<PaymentOrder> {
        Ok(PaymentOrder {
            id: self.require_id()?,
            amount: self.require_amount()?,
            currency: self.currency,
            installment: self.installment,
            ip: self.ip.clone(),
            email: self.email.clone(),
            success_url: self.success_url.clone(),
            fail_url: self.fail_url.clone(),
            lang: self.lang,
            recurring: self.recurring,
        })
    }

    pub fn to_post_auth(&self) -> Result<PostAuthOrder> {
        Ok(PostAuthOrder {
            id: self.require_id()?,
            amount: self.require_amount()?,
            currency: self.currency,
            ip: self.ip.clone(),
        })
    }

    pub fn to_status(&self) -> Result<StatusOrder> {
        Ok(StatusOrder {
            id: self.require_id()?,
            currency: self.currency,
            lang: self.lang,
        })
    }

    pub fn to_cancel(&self) -> Result<CancelOrder> {
        Ok(CancelOrder {
            id: self.require_id()?,
            currency: self.currency,
            amount: self.amount,
            ip: self.ip.clone(),
            lang: self.lang,
            trans_id: self.trans_id.clone(),
            ref_ret_num: self.ref_ret_num.clone(),
        })
    }

    pub fn to_refund(&self) -> Result<RefundOrder> {
        Ok(RefundOrder {
            id: self.require_id()?,
            amount: self.require_amount()?,
            currency: self.currency,
            ip: self.ip.clone(),
            lang: self.lang,
            trans_id: self.trans_id.clone(),
        })
    }
}

/// Fields needed to charge or to build a 3-D form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub id: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub installment: u32,
    pub ip: Option<String>,
    pub email: Option<String>,
    pub success_url: Option<String>,
    pub fail_url: Option<String>,
    pub lang: Option<Language>,
    pub recurring: Option<RecurringPlan>,
}

impl PaymentOrder {
    pub fn require_success_url(&self) -> Result<&str> {
        self.success_url
            .as_deref()
            .ok_or_else(|| PosError::missing_field("success_url"))
    }

    pub fn require_fail_url(&self) -> Result<&str> {
        self.fail_url
            .as_deref()
            .ok_or_else(|| PosError::missing_field("fail_url"))
    }

    pub fn require_ip(&self) -> Result<&str> {
        self.ip.as_deref().ok_or_else(|| PosError::missing_field("ip"))
    }
}

/// Fields needed to capture a pre-authorization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostAuthOrder {
    pub id: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub ip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusOrder {
    pub id: String,
    pub currency: Currency,
    pub lang: Option<Language>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelOrder {
    pub id: String,
    pub currency: Currency,
    pub amount: Option<Decimal>,
    pub ip: Option<String>,
    pub lang: Option<Language>,
    pub trans_id: Option<String>,
    pub ref_ret_num: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundOrder {
    pub id: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub ip: Option<String>,
    pub lang: Option<Language>,
    pub trans_id: Option<String>,
}

/// History query: a single order's transactions, or every transaction of a day.
/// When both are given the order id wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub order_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub lang: Option<Language>,
}

impl HistoryQuery {
    pub fn for_order(order_id: impl Into<String>) -> Self {
        Self {
            order_id: Some(order_id.into()),
            ..Default::default()
        }
    }

    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.order_id.is_none() && self.date.is_none() {
            return Err(PosError::validation(
                "history query needs an order id or a date",
            ));
        }
        Ok(())
    }
}
