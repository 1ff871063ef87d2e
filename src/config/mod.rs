use crate::core::{PosError, Result};
use crate::modules::gateways::models::GatewayEnvironment;
use serde::Deserialize;
use std::env;

pub mod banks;

pub use banks::{default_banks, BankDefinition};

/// Main library configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub pos: PosConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PosConfig {
    pub environment: GatewayEnvironment,
    pub http_timeout_secs: u64,
    pub banks: Vec<BankDefinition>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let test_mode = parse_bool("POS_TEST_MODE", lookup("POS_TEST_MODE"), true)?;
        let environment = if test_mode {
            GatewayEnvironment::Test
        } else {
            GatewayEnvironment::Production
        };

        let http_timeout_secs = lookup("POS_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .map_err(|_| PosError::configuration("Invalid POS_HTTP_TIMEOUT_SECS"))?;

        let banks = default_banks(environment)
            .into_iter()
            .map(|mut bank| {
                let prefix = bank.env_prefix();
                if let Some(url) = lookup(&format!("{}_API_URL", prefix)) {
                    bank.endpoints.api_url = url;
                }
                if let Some(url) = lookup(&format!("{}_GATEWAY_3D_URL", prefix)) {
                    bank.endpoints.gateway_3d_url = Some(url);
                }
                if let Some(url) = lookup(&format!("{}_GATEWAY_3D_HOST_URL", prefix)) {
                    bank.endpoints.gateway_3d_host_url = Some(url);
                }
                if let Some(url) = lookup(&format!("{}_QUERY_API_URL", prefix)) {
                    bank.endpoints.query_api_url = Some(url);
                }
                bank
            })
            .collect();

        Ok(Config {
            app: AppConfig {
                env: lookup("APP_ENV").unwrap_or_else(|| "development".to_string()),
                log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            },
            pos: PosConfig {
                environment,
                http_timeout_secs,
                banks,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.pos.http_timeout_secs == 0 {
            return Err(PosError::configuration(
                "HTTP timeout must be greater than 0",
            ));
        }

        if let Some(bank) = self
            .pos
            .banks
            .iter()
            .find(|bank| bank.endpoints.api_url.trim().is_empty())
        {
            return Err(PosError::configuration(format!(
                "Bank '{}' has no API URL",
                bank.id
            )));
        }

        Ok(())
    }

    pub fn bank(&self, id: &str) -> Option<&BankDefinition> {
        self.pos.banks.iter().find(|bank| bank.id == id)
    }
}

fn parse_bool(key: &str, value: Option<String>, default: bool) -> Result<bool> {
    match value.as_deref().map(|v| v.trim().to_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(PosError::configuration(format!("Invalid {}", key))),
        },
    }
}
