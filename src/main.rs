use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use country_agent::{AgentConfig, ChatAgent, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal outside development
    let _ = dotenvy::dotenv();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config =
        AgentConfig::load_from_path(config_path).context("Failed to load configuration")?;

    logging::init(&config.logging).context("Failed to initialise logging")?;
    tracing::info!("Starting country-agent {}", country_agent::VERSION);

    let agent = ChatAgent::from_config(&config).context("Failed to build chat agent")?;
    web::run(&config.server, Arc::new(agent)).await
}
