use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{PosError, Result};
use crate::modules::accounts::PaymentModel;

/// Protocol family a bank speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GatewayKind {
    EstPos,
    EstV3Pos,
    InterPos,
    PayForPos,
    PayFlexCpV4Pos,
}

impl fmt::Display for GatewayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayKind::EstPos => write!(f, "EstPos"),
            GatewayKind::EstV3Pos => write!(f, "EstV3Pos"),
            GatewayKind::InterPos => write!(f, "InterPos"),
            GatewayKind::PayForPos => write!(f, "PayForPos"),
            GatewayKind::PayFlexCpV4Pos => write!(f, "PayFlexCpV4Pos"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayEnvironment {
    #[default]
    Test,
    Production,
}

/// Bank URLs for one environment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayEndpoints {
    /// Server-to-server API
    pub api_url: String,
    /// 3-D form target for 3D_SECURE and 3D_PAY
    pub gateway_3d_url: Option<String>,
    /// Bank-hosted payment page for 3D_HOST
    pub gateway_3d_host_url: Option<String>,
    /// Status query API, for banks that keep it apart from `api_url`
    pub query_api_url: Option<String>,
}

impl GatewayEndpoints {
    /// Form target for a payment model; 3D_HOST goes to the hosted page
    pub fn form_url(&self, model: PaymentModel) -> Result<&str> {
        let url = match model {
            PaymentModel::ThreeDHost => self.gateway_3d_host_url.as_deref(),
            PaymentModel::ThreeDSecure | PaymentModel::ThreeDPay => self.gateway_3d_url.as_deref(),
            PaymentModel::NonSecure => None,
        };
        url.ok_or_else(|| {
            PosError::configuration(format!("no 3-D gateway URL configured for model {}", model))
        })
    }

    pub fn query_url(&self) -> &str {
        self.query_api_url.as_deref().unwrap_or(&self.api_url)
    }
}
