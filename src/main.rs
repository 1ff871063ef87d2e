use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vpos::config::Config;
use vpos::gateways::{GatewayRegistry, ReqwestTransport};

fn main() -> vpos::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("vpos={}", config.app.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.validate()?;

    tracing::info!("Checking virtual POS configuration");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Bank environment: {:?}", config.pos.environment);

    let transport = ReqwestTransport::new(Duration::from_secs(config.pos.http_timeout_secs))?;
    let registry = GatewayRegistry::from_config(&config, Arc::new(transport));

    for bank in registry.list_banks() {
        let definition = registry.bank(&bank.id)?;
        tracing::info!(
            bank = %bank.id,
            kind = %bank.kind,
            api_url = %definition.endpoints.api_url,
            gateway_3d_url = ?definition.endpoints.gateway_3d_url,
            "Bank configured"
        );
    }

    tracing::info!("{} banks configured", registry.list_banks().len());
    Ok(())
}
