//! Per-turn conversation models: classified request and the reply handed back

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::{Coordinate, MapPin};

/// The classified purpose of a user's message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    GetCountryInfo,
    CompareCountries,
    GetWeather,
    GetExchangeRate,
    GetNews,
    TravelRecommendation,
    GeneralChat,
    /// Anything the classifier produced outside the taxonomy
    Unrecognized,
}

impl Intent {
    /// The seven intents the classifier may choose from
    pub const TAXONOMY: [Intent; 7] = [
        Intent::GetCountryInfo,
        Intent::CompareCountries,
        Intent::GetWeather,
        Intent::GetExchangeRate,
        Intent::GetNews,
        Intent::TravelRecommendation,
        Intent::GeneralChat,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::GetCountryInfo => "get_country_info",
            Intent::CompareCountries => "compare_countries",
            Intent::GetWeather => "get_weather",
            Intent::GetExchangeRate => "get_exchange_rate",
            Intent::GetNews => "get_news",
            Intent::TravelRecommendation => "travel_recommendation",
            Intent::GeneralChat => "general_chat",
            Intent::Unrecognized => "unrecognized",
        }
    }

    /// Map a classifier label onto the taxonomy; unknown labels are `Unrecognized`
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        Self::TAXONOMY
            .into_iter()
            .find(|intent| intent.as_str().eq_ignore_ascii_case(label))
            .unwrap_or(Intent::Unrecognized)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A slot value: free text or a list (country pairs for comparisons)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityValue {
    Text(String),
    List(Vec<String>),
}

/// Extracted entity slots; every slot is optional
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entities(BTreeMap<String, EntityValue>);

impl Entities {
    /// Keep string and string-list slots from raw JSON, dropping blanks,
    /// nulls, numbers and nested objects
    ///
    /// A list is kept whole or not at all: one blank or non-string item
    /// drops the slot, so its length is never shortened.
    #[must_use]
    pub fn from_json(raw: BTreeMap<String, Value>) -> Self {
        let slots = raw
            .into_iter()
            .filter_map(|(key, value)| {
                let value = match value {
                    Value::String(text) if !text.trim().is_empty() => {
                        EntityValue::Text(text.trim().to_string())
                    }
                    Value::Array(items) if !items.is_empty() => {
                        let list = items
                            .into_iter()
                            .map(|item| match item {
                                Value::String(text) if !text.trim().is_empty() => {
                                    Some(text.trim().to_string())
                                }
                                _ => None,
                            })
                            .collect::<Option<Vec<String>>>()?;
                        EntityValue::List(list)
                    }
                    _ => return None,
                };
                Some((key, value))
            })
            .collect();
        Self(slots)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: EntityValue) {
        self.0.insert(key.into(), value);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&EntityValue> {
        self.0.get(key)
    }

    /// A slot holding plain text
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(EntityValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Classifier output for one user turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRequest {
    pub intent: Intent,
    pub entities: Entities,
}

impl ClassifiedRequest {
    #[must_use]
    pub fn new(intent: Intent, entities: Entities) -> Self {
        Self { intent, entities }
    }
}

/// What a turn hands back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurnResult {
    #[serde(rename = "reply")]
    pub reply_text: String,
    #[serde(rename = "country_latlng", skip_serializing_if = "Option::is_none")]
    pub map_coordinate: Option<Coordinate>,
    #[serde(rename = "country_name", skip_serializing_if = "Option::is_none")]
    pub map_label: Option<String>,
}

impl ChatTurnResult {
    #[must_use]
    pub fn new(reply_text: String, map: Option<MapPin>) -> Self {
        let (map_coordinate, map_label) = match map {
            Some(pin) => (Some(pin.coordinate), Some(pin.label)),
            None => (None, None),
        };
        Self {
            reply_text,
            map_coordinate,
            map_label,
        }
    }
}
