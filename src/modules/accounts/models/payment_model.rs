use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment model chosen for an account; decides the lifecycle branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentModel {
    /// Direct charge without redirect authentication
    NonSecure,
    /// Redirect authentication followed by a server-side charge request
    #[serde(rename = "3d_secure")]
    ThreeDSecure,
    /// Bank authenticates and charges before posting back
    #[serde(rename = "3d_pay")]
    ThreeDPay,
    /// Bank-hosted payment page, bank charges before posting back
    #[serde(rename = "3d_host")]
    ThreeDHost,
}

impl PaymentModel {
    pub fn is_3d(&self) -> bool {
        !matches!(self, PaymentModel::NonSecure)
    }
}

impl fmt::Display for PaymentModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentModel::NonSecure => write!(f, "regular"),
            PaymentModel::ThreeDSecure => write!(f, "3d"),
            PaymentModel::ThreeDPay => write!(f, "3d_pay"),
            PaymentModel::ThreeDHost => write!(f, "3d_host"),
        }
    }
}

impl std::str::FromStr for PaymentModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "regular" | "non_secure" => Ok(PaymentModel::NonSecure),
            "3d" | "3d_secure" => Ok(PaymentModel::ThreeDSecure),
            "3d_pay" => Ok(PaymentModel::ThreeDPay),
            "3d_host" => Ok(PaymentModel::ThreeDHost),
            _ => Err(format!("Invalid payment model: {}", s)),
        }
    }
}

/// Language of bank pages and messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Tr,
    En,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Tr => write!(f, "tr"),
            Language::En => write!(f, "en"),
        }
    }
}
