//! Entity Resolution Module
//!
//! Turns the classifier's free-form entity slots into concrete lookup keys:
//! country names, the place to sample weather at, and currency codes.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::Result;
use crate::gateways::CountryGateway;
use crate::models::exchange::REFERENCE_CURRENCY;
use crate::models::{Entities, EntityValue};

/// Any standalone three-letter alphabetic token. Nothing checks that the token
/// is a real ISO 4217 code, so words like "Nam" in "Việt Nam" match too.
static CURRENCY_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z]{3}\b").expect("currency pattern is valid"));

/// The `country` slot after arity normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountrySlot {
    Absent,
    Single(String),
    Pair(String, String),
}

impl CountrySlot {
    /// Name to use when one country is needed; a pair yields its first name
    #[must_use]
    pub fn primary(&self) -> Option<&str> {
        match self {
            CountrySlot::Absent => None,
            CountrySlot::Single(name) | CountrySlot::Pair(name, _) => Some(name),
        }
    }
}

/// Service for resolving entity slots
pub struct EntityResolver;

impl EntityResolver {
    /// A string or a two-element list; every other shape is absent
    #[must_use]
    pub fn country_slot(entities: &Entities) -> CountrySlot {
        match entities.get("country") {
            Some(EntityValue::Text(name)) => CountrySlot::Single(name.clone()),
            Some(EntityValue::List(names)) => match names.as_slice() {
                [first, second] => CountrySlot::Pair(first.clone(), second.clone()),
                _ => CountrySlot::Absent,
            },
            None => CountrySlot::Absent,
        }
    }

    /// Place named for a weather question: `location`, else the country slot
    #[must_use]
    pub fn weather_place(entities: &Entities) -> Option<String> {
        entities
            .text("location")
            .map(str::to_string)
            .or_else(|| Self::country_slot(entities).primary().map(str::to_string))
    }

    /// First three-letter token in `text`, uppercased
    #[must_use]
    pub fn scan_currency_code(text: &str) -> Option<String> {
        CURRENCY_TOKEN
            .find(text)
            .map(|token| token.as_str().to_uppercase())
    }

    /// Target named by the user, else the reference currency
    #[must_use]
    pub fn target_currency(entities: &Entities) -> String {
        entities
            .text("target_currency")
            .and_then(Self::scan_currency_code)
            .unwrap_or_else(|| REFERENCE_CURRENCY.to_string())
    }

    /// Resolve the base currency for an exchange question
    ///
    /// 1. a named country's primary currency, via the country gateway
    /// 2. a three-letter token scanned out of the `currency` slot
    /// 3. otherwise `None`, and the caller asks the user to clarify
    ///
    /// A country that is not found or has no currency falls through to step 2;
    /// a country gateway failure is returned as an error.
    pub async fn resolve_base_currency(
        entities: &Entities,
        countries: &dyn CountryGateway,
    ) -> Result<Option<String>> {
        if let Some(name) = Self::country_slot(entities).primary() {
            debug!("Resolving currency through country '{}'", name);
            match countries.lookup(name).await? {
                Some(country) => {
                    if let Some(code) = country.primary_currency_code() {
                        debug!("Using {} from '{}'", code, country.common_name);
                        return Ok(Some(code.to_string()));
                    }
                    debug!("Country '{}' lists no currency", name);
                }
                None => debug!("Country '{}' not found, scanning currency text", name),
            }
        }

        let scanned = entities
            .text("currency")
            .and_then(Self::scan_currency_code);
        if scanned.is_none() {
            debug!("No base currency could be resolved");
        }
        Ok(scanned)
    }
}
