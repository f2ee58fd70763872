//! Data models for the country agent
//!
//! This module contains the core domain models organized by concern:
//! - Coordinate: Geographic coordinates and map pins
//! - Country, Weather, Exchange, News: normalized gateway records
//! - Chat: Classified requests and per-turn results
//!
//! Every record lives for one request only; nothing here is cached.

pub mod chat;
pub mod coordinate;
pub mod country;
pub mod exchange;
pub mod news;
pub mod weather;

// Re-export all public types for convenient access
pub use chat::{ChatTurnResult, ClassifiedRequest, Entities, EntityValue, Intent};
pub use coordinate::{Coordinate, MapPin};
pub use country::{CountryRecord, CurrencyInfo};
pub use exchange::{ExchangeRecord, ExchangeTier, RateTable};
pub use news::{NewsArticle, NewsDigest};
pub use weather::WeatherRecord;
