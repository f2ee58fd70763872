//! Configuration management for the country agent
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::AgentError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the country agent
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AgentConfig {
    /// Language model endpoint used for classification and synthesis
    #[serde(default)]
    pub llm: LlmConfig,
    /// Country facts provider
    #[serde(default)]
    pub countries: CountriesConfig,
    /// Current weather provider
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Currency exchange provider
    #[serde(default)]
    pub exchange: ExchangeConfig,
    /// News headlines provider
    #[serde(default)]
    pub news: NewsConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// OpenAI-compatible chat completion endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Full URL of the `/v1/chat/completions` endpoint
    #[serde(default = "default_llm_api_url")]
    pub api_url: String,
    /// Model identifier sent with every request
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Sampling temperature
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u32,
    /// Bearer token; `None` for keyless local servers
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountriesConfig {
    #[serde(default = "default_countries_base_url")]
    pub base_url: String,
    #[serde(default = "default_gateway_timeout")]
    pub timeout_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    pub api_key: Option<String>,
    /// Language code for condition descriptions
    #[serde(default = "default_weather_lang")]
    pub lang: String,
    #[serde(default = "default_gateway_timeout")]
    pub timeout_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    #[serde(default = "default_exchange_base_url")]
    pub base_url: String,
    pub api_key: Option<String>,
    #[serde(default = "default_gateway_timeout")]
    pub timeout_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    #[serde(default = "default_news_base_url")]
    pub base_url: String,
    pub api_key: Option<String>,
    #[serde(default = "default_gateway_timeout")]
    pub timeout_seconds: u32,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_server_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Directory served for paths no route matches
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_llm_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_temperature() -> f32 {
    0.3
}

fn default_llm_timeout() -> u32 {
    60
}

fn default_gateway_timeout() -> u32 {
    30
}

fn default_countries_base_url() -> String {
    "https://restcountries.com/v3.1".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_weather_lang() -> String {
    "vi".to_string()
}

fn default_exchange_base_url() -> String {
    "https://v6.exchangerate-api.com/v6".to_string()
}

fn default_news_base_url() -> String {
    "https://newsapi.org/v2".to_string()
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    5000
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: default_llm_api_url(),
            model: default_llm_model(),
            temperature: default_llm_temperature(),
            timeout_seconds: default_llm_timeout(),
            api_key: None,
        }
    }
}

impl Default for CountriesConfig {
    fn default() -> Self {
        Self {
            base_url: default_countries_base_url(),
            timeout_seconds: default_gateway_timeout(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            api_key: None,
            lang: default_weather_lang(),
            timeout_seconds: default_gateway_timeout(),
        }
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: default_exchange_base_url(),
            api_key: None,
            timeout_seconds: default_gateway_timeout(),
        }
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: default_news_base_url(),
            api_key: None,
            timeout_seconds: default_gateway_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AgentConfig {
    /// Load configuration from `config_path`, the platform config directory
    /// or `./config.toml`, with environment overrides on top
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with COUNTRY_AGENT_ prefix
        builder = builder.add_source(
            Environment::with_prefix("COUNTRY_AGENT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AgentConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_key_fallbacks(|name| std::env::var(name).ok());
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("country-agent").join("config.toml"))
    }

    /// Fill unset provider keys from their conventional environment variables
    pub fn apply_key_fallbacks(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let slots = [
            (&mut self.llm.api_key, "LLM_API_KEY"),
            (&mut self.weather.api_key, "OPENWEATHER_API_KEY"),
            (&mut self.exchange.api_key, "EXCHANGE_RATE_API_KEY"),
            (&mut self.news.api_key, "NEWS_API_KEY"),
        ];
        for (slot, variable) in slots {
            if slot.is_none() {
                *slot = lookup(variable);
            }
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.llm.api_url.is_empty() {
            self.llm.api_url = default_llm_api_url();
        }
        if self.llm.model.is_empty() {
            self.llm.model = default_llm_model();
        }
        if self.countries.base_url.is_empty() {
            self.countries.base_url = default_countries_base_url();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.lang.is_empty() {
            self.weather.lang = default_weather_lang();
        }
        if self.exchange.base_url.is_empty() {
            self.exchange.base_url = default_exchange_base_url();
        }
        if self.news.base_url.is_empty() {
            self.news.base_url = default_news_base_url();
        }
        if self.server.static_dir.is_empty() {
            self.server.static_dir = default_static_dir();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Keys are optional, but a key that is present must not be blank
    pub fn validate_api_keys(&self) -> Result<()> {
        let keys = [
            ("LLM", &self.llm.api_key),
            ("Weather", &self.weather.api_key),
            ("Exchange", &self.exchange.api_key),
            ("News", &self.news.api_key),
        ];
        for (provider, key) in keys {
            if key.as_deref().is_some_and(|k| k.trim().is_empty()) {
                return Err(AgentError::config(format!(
                    "{provider} API key cannot be empty if provided. Either remove it or provide a valid key."
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        let timeouts = [
            ("LLM", self.llm.timeout_seconds),
            ("Countries", self.countries.timeout_seconds),
            ("Weather", self.weather.timeout_seconds),
            ("Exchange", self.exchange.timeout_seconds),
            ("News", self.news.timeout_seconds),
        ];
        for (provider, timeout) in timeouts {
            if timeout == 0 || timeout > 300 {
                return Err(AgentError::config(format!(
                    "{provider} timeout must be between 1 and 300 seconds"
                ))
                .into());
            }
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(AgentError::config("LLM temperature must be between 0.0 and 2.0").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        if let Err(e) = crate::logging::parse_level(&self.logging.level) {
            return Err(AgentError::config(format!(
                "Invalid log level '{}': {e}. Must be one of: error, warn, info, debug, trace",
                self.logging.level
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AgentError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("LLM API", &self.llm.api_url),
            ("Countries base", &self.countries.base_url),
            ("Weather base", &self.weather.base_url),
            ("Exchange base", &self.exchange.base_url),
            ("News base", &self.news.base_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AgentError::config(format!(
                    "{name} URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
