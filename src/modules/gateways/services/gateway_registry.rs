use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info};

use super::est_pos::EstPos;
use super::gateway_trait::PosGateway;
use super::inter_pos::InterPos;
use super::pay_flex_cp_v4_pos::PayFlexCpV4Pos;
use super::pay_for_pos::PayForPos;
use super::transport::HttpTransport;
use crate::config::{BankDefinition, Config};
use crate::core::{PosError, Result};
use crate::modules::accounts::Account;
use crate::modules::gateways::mappers::PreHashHooks;
use crate::modules::gateways::models::GatewayKind;

/// Resolves bank ids to gateways and keeps the ones already built
pub struct GatewayRegistry {
    banks: HashMap<String, BankDefinition>,
    gateways: HashMap<String, Arc<dyn PosGateway>>,
    transport: Arc<dyn HttpTransport>,
}

impl GatewayRegistry {
    /// Create an empty registry; banks are added with [`register_bank`](Self::register_bank)
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            banks: HashMap::new(),
            gateways: HashMap::new(),
            transport,
        }
    }

    /// Create a registry knowing every bank in `config`
    pub fn from_config(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        let mut registry = Self::new(transport);
        for bank in &config.pos.banks {
            registry.register_bank(bank.clone());
        }
        registry
    }

    pub fn register_bank(&mut self, bank: BankDefinition) {
        self.banks.insert(bank.id.clone(), bank);
    }

    /// Get a bank definition by registry id
    pub fn bank(&self, id: &str) -> Result<&BankDefinition> {
        self.banks
            .get(id)
            .ok_or_else(|| PosError::configuration(format!("Bank '{}' not registered", id)))
    }

    /// Build a gateway for the account's bank
    pub fn create_gateway(&self, account: Account, hooks: PreHashHooks) -> Result<Arc<dyn PosGateway>> {
        let bank = match self.bank(account.bank()) {
            Ok(bank) => bank,
            Err(e) => {
                error!(bank = %account.bank(), error = %e, "Unknown bank");
                return Err(e);
            }
        };

        let endpoints = bank.endpoints.clone();
        let transport = Arc::clone(&self.transport);
        let gateway: Arc<dyn PosGateway> = match bank.kind {
            GatewayKind::EstPos => Arc::new(EstPos::new(account, endpoints, transport, hooks)),
            GatewayKind::EstV3Pos => Arc::new(EstPos::v3(account, endpoints, transport, hooks)),
            GatewayKind::InterPos => Arc::new(InterPos::new(account, endpoints, transport, hooks)),
            GatewayKind::PayForPos => Arc::new(PayForPos::new(account, endpoints, transport, hooks)),
            GatewayKind::PayFlexCpV4Pos => {
                Arc::new(PayFlexCpV4Pos::new(account, endpoints, transport, hooks))
            }
        };

        info!(
            bank = %bank.id,
            kind = %bank.kind,
            model = %gateway.account().model(),
            "Gateway created"
        );
        Ok(gateway)
    }

    /// Register a gateway under its account's bank id
    pub fn register_gateway(&mut self, gateway: Arc<dyn PosGateway>) {
        let bank = gateway.account().bank().to_string();
        self.gateways.insert(bank, gateway);
    }

    /// Build and register a gateway for `account`
    pub fn add_account(&mut self, account: Account, hooks: PreHashHooks) -> Result<Arc<dyn PosGateway>> {
        let gateway = self.create_gateway(account, hooks)?;
        self.register_gateway(Arc::clone(&gateway));
        Ok(gateway)
    }

    /// Get a registered gateway by bank id
    pub fn get_gateway(&self, bank: &str) -> Result<Arc<dyn PosGateway>> {
        self.gateways
            .get(bank)
            .cloned()
            .ok_or_else(|| PosError::configuration(format!("No gateway registered for bank '{}'", bank)))
    }

    /// List all known banks, sorted by id
    pub fn list_banks(&self) -> Vec<BankInfo> {
        let mut banks: Vec<BankInfo> = self
            .banks
            .values()
            .map(|bank| BankInfo {
                id: bank.id.clone(),
                name: bank.name.clone(),
                kind: bank.kind,
                registered: self.gateways.contains_key(&bank.id),
            })
            .collect();
        banks.sort_by(|a, b| a.id.cmp(&b.id));
        banks
    }
}

/// Bank information for listing
#[derive(Debug, Clone, serde::Serialize)]
pub struct BankInfo {
    pub id: String,
    pub name: String,
    pub kind: GatewayKind,
    pub registered: bool,
}
