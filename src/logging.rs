//! Logging initialisation via tracing-subscriber.
//!
//! Call [`init`] once at startup, after configuration is loaded.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::{AgentError, Result};

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| AgentError::config(format!("invalid log level '{}': {e}", config.level)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match config.format.as_str() {
        "json" => builder.json().try_init(),
        _ => builder.pretty().try_init(),
    };
    installed.map_err(|e| AgentError::config(format!("failed to set subscriber: {e}")))
}

/// Parse a log level string, rejecting anything tracing does not know
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    if level.is_empty() {
        return Err(AgentError::config("log level must not be empty"));
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| AgentError::config(format!("unrecognised log level: '{level}'")))
}
