//! Geographic coordinate and map pin models

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair, serialized as `[lat, lon]`
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build from a provider `[lat, lon]` list; anything but two values is absent
    #[must_use]
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            [lat, lon] => Some(Self::new(*lat, *lon)),
            _ => None,
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([latitude, longitude]: [f64; 2]) -> Self {
        Self::new(latitude, longitude)
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coordinate: Coordinate) -> Self {
        [coordinate.latitude, coordinate.longitude]
    }
}

/// Where the front end should center its map for a reply
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MapPin {
    pub coordinate: Coordinate,
    pub label: String,
}

impl MapPin {
    #[must_use]
    pub fn new(coordinate: Coordinate, label: impl Into<String>) -> Self {
        Self {
            coordinate,
            label: label.into(),
        }
    }
}
