//! Country facts as returned by the country gateway

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Coordinate, MapPin};

/// Display name and symbol of a currency
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrencyInfo {
    pub name: String,
    pub symbol: Option<String>,
}

/// Normalized country record; read-only once fetched
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CountryRecord {
    pub common_name: String,
    pub official_name: String,
    pub capital: Vec<String>,
    pub population: u64,
    /// Area in square kilometres
    pub area: Option<f64>,
    pub region: String,
    pub subregion: Option<String>,
    /// Language code to language name
    pub languages: BTreeMap<String, String>,
    /// ISO 4217 code to currency details
    pub currencies: BTreeMap<String, CurrencyInfo>,
    /// Country centroid
    pub latlng: Option<Coordinate>,
    pub capital_latlng: Option<Coordinate>,
    /// ISO 3166-1 alpha-2 code
    pub alpha2_code: String,
}

impl CountryRecord {
    /// First listed capital, if any
    #[must_use]
    pub fn capital_name(&self) -> Option<&str> {
        self.capital.first().map(String::as_str)
    }

    /// Currency code used for exchange lookups
    ///
    /// Currencies are keyed by code, so with several on record this is the
    /// alphabetically first code, not the provider's first entry.
    #[must_use]
    pub fn primary_currency_code(&self) -> Option<&str> {
        self.currencies.keys().next().map(String::as_str)
    }

    /// Where to sample weather: the capital, else the centroid
    #[must_use]
    pub fn weather_coordinate(&self) -> Option<Coordinate> {
        self.capital_latlng.or(self.latlng)
    }

    /// Map pin at the country centroid
    #[must_use]
    pub fn map_pin(&self) -> Option<MapPin> {
        self.latlng
            .map(|coordinate| MapPin::new(coordinate, self.common_name.clone()))
    }

    /// Comma-joined language names
    #[must_use]
    pub fn language_list(&self) -> String {
        self.languages.values().cloned().collect::<Vec<_>>().join(", ")
    }

    /// Comma-joined `Name (symbol)` entries
    #[must_use]
    pub fn currency_list(&self) -> String {
        self.currencies
            .values()
            .map(|currency| match &currency.symbol {
                Some(symbol) => format!("{} ({symbol})", currency.name),
                None => currency.name.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
