//! `country-agent` - Conversational assistant for questions about countries
//!
//! This library classifies a user's message with a language model, fetches
//! country facts, weather, exchange rates or headlines from external
//! providers, and writes the reply back through the language model with
//! deterministic fallbacks when it is unavailable.

pub mod agent;
pub mod api;
pub mod classifier;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod gateways;
pub mod llm;
pub mod logging;
pub mod messages;
pub mod models;
pub mod postprocess;
pub mod resolver;
pub mod synthesizer;
pub mod web;

// Re-export core types for public API
pub use agent::{ChatAgent, DispatchPath, ReplySource, TurnReport};
pub use classifier::{Classifier, LlmClassifier};
pub use config::AgentConfig;
pub use error::AgentError;
pub use gateways::{CountryGateway, ExchangeGateway, NewsGateway, Services, WeatherGateway};
pub use llm::LlmClient;
pub use models::{ChatTurnResult, ClassifiedRequest, Intent};
pub use synthesizer::{LlmSynthesizer, SynthesisTask, Synthesizer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AgentError>;
