//! OpenWeatherMap current weather client
//!
//! Coordinates in, one [`WeatherRecord`] out. Units are metric and the
//! condition text is localized with the configured language code.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument};

use super::WeatherGateway;
use super::http::{self, Fetched};
use crate::config::WeatherConfig;
use crate::models::{Coordinate, WeatherRecord};
use crate::{AgentError, Result};

const SERVICE: &str = "OpenWeatherMap";

pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    lang: String,
}

impl OpenWeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config.timeout_seconds)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            lang: config.lang.clone(),
        })
    }
}

#[async_trait]
impl WeatherGateway for OpenWeatherClient {
    #[instrument(skip(self), fields(lat = at.latitude, lon = at.longitude))]
    async fn current(&self, at: Coordinate) -> Result<WeatherRecord> {
        let api_key = http::require_key(self.api_key.as_deref(), SERVICE)?;
        let query = format!(
            "{}/weather?lat={}&lon={}&units=metric&lang={}",
            self.base_url,
            at.latitude,
            at.longitude,
            urlencoding::encode(&self.lang)
        );
        let url = format!("{query}&appid={}", urlencoding::encode(api_key));

        let fetched: Fetched<CurrentWeatherResponse> =
            http::get_json(&self.client, SERVICE, &url, &query).await?;
        let response = match fetched {
            Fetched::Found(response) => response,
            Fetched::NotFound => {
                return Err(AgentError::api(format!(
                    "{SERVICE} has no data for {}",
                    at.format_coordinates()
                )));
            }
        };

        let record = response.into_record(at);
        info!(
            "Weather at {}: {}, {}",
            record.location_label,
            record.description,
            record.format_temperature()
        );
        Ok(record)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentWeatherResponse {
    #[serde(default)]
    weather: Vec<Condition>,
    main: MainReadings,
    #[serde(default)]
    wind: Wind,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize, Default)]
struct Wind {
    #[serde(default)]
    speed: f64,
}

impl CurrentWeatherResponse {
    /// Coordinates stand in for the place name when the provider gives none
    fn into_record(self, at: Coordinate) -> WeatherRecord {
        let description = self
            .weather
            .into_iter()
            .next()
            .map(|condition| condition.description)
            .unwrap_or_default();
        let location_label = if self.name.trim().is_empty() {
            at.format_coordinates()
        } else {
            self.name
        };

        WeatherRecord {
            description,
            temp_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            humidity_pct: self.main.humidity,
            wind_speed_mps: self.wind.speed,
            location_label,
        }
    }
}
