//! ExchangeRate-API v6 client
//!
//! Returns the full rate table for a base currency; choosing which rate to
//! report is [`ExchangeRecord::select`](crate::models::ExchangeRecord::select)'s job.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

use super::ExchangeGateway;
use super::http::{self, Fetched};
use crate::config::ExchangeConfig;
use crate::models::RateTable;
use crate::{AgentError, Result};

const SERVICE: &str = "ExchangeRate-API";

pub struct ExchangeRateClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ExchangeRateClient {
    pub fn new(config: &ExchangeConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config.timeout_seconds)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl ExchangeGateway for ExchangeRateClient {
    #[instrument(skip(self))]
    async fn rates(&self, base: &str) -> Result<Option<RateTable>> {
        let api_key = http::require_key(self.api_key.as_deref(), SERVICE)?;
        let base = base.trim().to_uppercase();
        let url = format!(
            "{}/{}/latest/{}",
            self.base_url,
            urlencoding::encode(api_key),
            urlencoding::encode(&base)
        );
        let redacted = format!("{}/***/latest/{}", self.base_url, base);

        let fetched: Fetched<LatestResponse> =
            http::get_json(&self.client, SERVICE, &url, &redacted).await?;
        match fetched {
            Fetched::Found(response) => response.into_table(&base),
            Fetched::NotFound => Ok(None),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LatestResponse {
    result: String,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    base_code: Option<String>,
    #[serde(default)]
    conversion_rates: BTreeMap<String, f64>,
}

impl LatestResponse {
    fn into_table(self, requested_base: &str) -> Result<Option<RateTable>> {
        if self.result != "success" {
            let error_type = self.error_type.unwrap_or_else(|| "unknown".to_string());
            if error_type == "unsupported-code" {
                info!("Currency '{}' is not supported by the provider", requested_base);
                return Ok(None);
            }
            warn!("Provider error for '{}': {}", requested_base, error_type);
            return Err(AgentError::api(format!("{SERVICE} error: {error_type}")));
        }

        let table = RateTable {
            base: self.base_code.unwrap_or_else(|| requested_base.to_string()),
            rates: self.conversion_rates,
        };
        info!("Loaded {} rates for {}", table.rates.len(), table.base);
        Ok(Some(table))
    }
}
