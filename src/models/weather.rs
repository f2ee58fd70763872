//! Current weather observation model and display methods

use serde::{Deserialize, Serialize};

/// One current-conditions reading, scoped to a single weather question
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherRecord {
    /// Human-readable description of weather conditions
    pub description: String,
    /// Temperature in Celsius
    pub temp_c: f64,
    /// Apparent temperature in Celsius
    pub feels_like_c: f64,
    /// Relative humidity percentage (0-100)
    pub humidity_pct: u8,
    /// Wind speed in m/s
    pub wind_speed_mps: f64,
    /// Place name the provider resolved the coordinates to
    pub location_label: String,
}

impl WeatherRecord {
    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1}°C", self.temp_c)
    }

    #[must_use]
    pub fn format_feels_like(&self) -> String {
        format!("{:.1}°C", self.feels_like_c)
    }

    /// Format wind information
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{:.1} m/s", self.wind_speed_mps)
    }
}
