//! External data gateways
//!
//! Each gateway performs one HTTP call per request and hands back a normalized
//! record. Lookups that can legitimately miss return `Ok(None)`; transport and
//! provider failures return `Err`. Nothing is cached between turns.

use async_trait::async_trait;
use std::sync::Arc;

use crate::Result;
use crate::config::AgentConfig;
use crate::models::{Coordinate, CountryRecord, NewsDigest, RateTable, WeatherRecord};

pub mod exchange_rate;
pub mod http;
pub mod news_api;
pub mod open_weather;
pub mod rest_countries;

pub use exchange_rate::ExchangeRateClient;
pub use news_api::NewsApiClient;
pub use open_weather::OpenWeatherClient;
pub use rest_countries::RestCountriesClient;

/// Country facts by exact name
#[async_trait]
pub trait CountryGateway: Send + Sync {
    async fn lookup(&self, name: &str) -> Result<Option<CountryRecord>>;
}

/// Current conditions at a coordinate
#[async_trait]
pub trait WeatherGateway: Send + Sync {
    async fn current(&self, at: Coordinate) -> Result<WeatherRecord>;
}

/// Rate table for a base currency code; `None` when the code is unknown
#[async_trait]
pub trait ExchangeGateway: Send + Sync {
    async fn rates(&self, base: &str) -> Result<Option<RateTable>>;
}

/// Top headlines for a two-letter country code
#[async_trait]
pub trait NewsGateway: Send + Sync {
    async fn top_headlines(&self, alpha2_code: &str) -> Result<NewsDigest>;
}

/// The four data sources a turn may consult
#[derive(Clone)]
pub struct Services {
    pub countries: Arc<dyn CountryGateway>,
    pub weather: Arc<dyn WeatherGateway>,
    pub exchange: Arc<dyn ExchangeGateway>,
    pub news: Arc<dyn NewsGateway>,
}

impl Services {
    /// Production gateways built from configuration
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        Ok(Self {
            countries: Arc::new(RestCountriesClient::new(&config.countries)?),
            weather: Arc::new(OpenWeatherClient::new(&config.weather)?),
            exchange: Arc::new(ExchangeRateClient::new(&config.exchange)?),
            news: Arc::new(NewsApiClient::new(&config.news)?),
        })
    }
}
