//! REST Countries v3.1 client
//!
//! Lookup is by exact name (`fullText=true`); there is no fuzzy matching, so a
//! misspelled name comes back as not found.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{info, instrument};

use super::CountryGateway;
use super::http::{self, Fetched};
use crate::Result;
use crate::config::CountriesConfig;
use crate::models::{Coordinate, CountryRecord, CurrencyInfo};

const SERVICE: &str = "REST Countries";

pub struct RestCountriesClient {
    client: Client,
    base_url: String,
}

impl RestCountriesClient {
    pub fn new(config: &CountriesConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config.timeout_seconds)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn lookup_url(&self, name: &str) -> String {
        format!(
            "{}/name/{}?fullText=true",
            self.base_url,
            urlencoding::encode(name.trim())
        )
    }
}

#[async_trait]
impl CountryGateway for RestCountriesClient {
    #[instrument(skip(self))]
    async fn lookup(&self, name: &str) -> Result<Option<CountryRecord>> {
        let url = self.lookup_url(name);
        let fetched: Fetched<Vec<RestCountry>> =
            http::get_json(&self.client, SERVICE, &url, &url).await?;

        let record = match fetched {
            Fetched::Found(countries) => countries.into_iter().next().map(CountryRecord::from),
            Fetched::NotFound => None,
        };

        match &record {
            Some(country) => info!("Resolved '{}' to {}", name, country.common_name),
            None => info!("No country named '{}'", name),
        }
        Ok(record)
    }
}

/// One element of the provider's response array
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RestCountry {
    name: RestName,
    #[serde(default)]
    capital: Vec<String>,
    #[serde(default)]
    population: u64,
    area: Option<f64>,
    #[serde(default)]
    region: String,
    subregion: Option<String>,
    #[serde(default)]
    languages: BTreeMap<String, String>,
    #[serde(default)]
    currencies: BTreeMap<String, RestCurrency>,
    #[serde(default)]
    latlng: Vec<f64>,
    capital_info: Option<RestCapitalInfo>,
    #[serde(default)]
    cca2: String,
}

#[derive(Debug, Deserialize)]
struct RestName {
    common: String,
    #[serde(default)]
    official: String,
}

#[derive(Debug, Deserialize)]
struct RestCurrency {
    #[serde(default)]
    name: String,
    symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RestCapitalInfo {
    #[serde(default)]
    latlng: Vec<f64>,
}

impl From<RestCountry> for CountryRecord {
    fn from(country: RestCountry) -> Self {
        let official_name = if country.name.official.is_empty() {
            country.name.common.clone()
        } else {
            country.name.official
        };

        CountryRecord {
            common_name: country.name.common,
            official_name,
            capital: country.capital,
            population: country.population,
            area: country.area,
            region: country.region,
            subregion: country.subregion.filter(|s| !s.is_empty()),
            languages: country.languages,
            currencies: country
                .currencies
                .into_iter()
                .map(|(code, currency)| {
                    (
                        code,
                        CurrencyInfo {
                            name: currency.name,
                            symbol: currency.symbol,
                        },
                    )
                })
                .collect(),
            latlng: Coordinate::from_slice(&country.latlng),
            capital_latlng: country
                .capital_info
                .and_then(|info| Coordinate::from_slice(&info.latlng)),
            alpha2_code: country.cca2,
        }
    }
}
