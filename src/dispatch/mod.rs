//! Intent dispatch
//!
//! One [`IntentHandler`] per intent, looked up in a [`DispatchTable`]. A
//! handler gathers whatever data its intent needs from the gateways and
//! decides how the turn ends: hand a task to the synthesizer, stop with a
//! fixed reply, or give up as unrecognized when a required entity is missing.
//! Handlers never fail; gateway errors become "unavailable" replies here.

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::warn;

use crate::AgentError;
use crate::gateways::Services;
use crate::messages;
use crate::models::{ClassifiedRequest, Intent, MapPin};
use crate::synthesizer::SynthesisTask;

pub mod compare;
pub mod conversation;
pub mod country_info;
pub mod exchange;
pub mod news;
pub mod weather;

pub use compare::CompareCountriesHandler;
pub use conversation::{GeneralChatHandler, TravelHandler};
pub use country_info::CountryInfoHandler;
pub use exchange::ExchangeRateHandler;
pub use news::NewsHandler;
pub use weather::WeatherHandler;

/// Why a turn stopped before synthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKind {
    NotFound,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TerminalReply {
    pub kind: TerminalKind,
    pub message: String,
}

impl TerminalReply {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: TerminalKind::NotFound,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: TerminalKind::Unavailable,
            message: message.into(),
        }
    }
}

/// How a handler wants the turn to end
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutcome {
    Synthesize {
        task: SynthesisTask,
        map: Option<MapPin>,
    },
    Terminal(TerminalReply),
    /// A required entity was missing
    Unrecognized,
}

impl HandlerOutcome {
    pub fn synthesize(task: SynthesisTask, map: Option<MapPin>) -> Self {
        Self::Synthesize { task, map }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::Terminal(TerminalReply::not_found(message))
    }

    /// A gateway failed; log it and tell the user that capability is down
    pub fn unavailable(capability: &str, error: &AgentError) -> Self {
        warn!(capability, error = %error, "Data source unavailable for this turn");
        Self::Terminal(TerminalReply::unavailable(messages::unavailable(capability)))
    }
}

/// Strategy for one intent
#[async_trait]
pub trait IntentHandler: Send + Sync {
    async fn handle(
        &self,
        request: &ClassifiedRequest,
        text: &str,
        services: &Services,
    ) -> HandlerOutcome;
}

/// Intent to handler lookup
pub struct DispatchTable {
    handlers: HashMap<Intent, Box<dyn IntentHandler>>,
}

impl DispatchTable {
    /// Table with no handlers; every intent is unrecognized
    #[must_use]
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// One handler for each intent in the taxonomy
    #[must_use]
    pub fn standard() -> Self {
        Self::empty()
            .with_handler(Intent::GetCountryInfo, CountryInfoHandler)
            .with_handler(Intent::CompareCountries, CompareCountriesHandler)
            .with_handler(Intent::GetWeather, WeatherHandler)
            .with_handler(Intent::GetExchangeRate, ExchangeRateHandler)
            .with_handler(Intent::GetNews, NewsHandler)
            .with_handler(Intent::TravelRecommendation, TravelHandler)
            .with_handler(Intent::GeneralChat, GeneralChatHandler)
    }

    #[must_use]
    pub fn with_handler(mut self, intent: Intent, handler: impl IntentHandler + 'static) -> Self {
        self.handlers.insert(intent, Box::new(handler));
        self
    }

    #[must_use]
    pub fn handler(&self, intent: Intent) -> Option<&dyn IntentHandler> {
        self.handlers.get(&intent).map(Box::as_ref)
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Capability names used in "unavailable" replies
pub(crate) mod capability {
    pub const COUNTRIES: &str = "tra cứu quốc gia";
    pub const WEATHER: &str = "thời tiết";
    pub const EXCHANGE: &str = "tỷ giá";
    pub const NEWS: &str = "tin tức";
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_covers_taxonomy() {
        let table = DispatchTable::standard();
        for intent in Intent::TAXONOMY {
            assert!(table.handler(intent).is_some(), "no handler for {intent}");
        }
        assert!(table.handler(Intent::Unrecognized).is_none());
    }

    #[test]
    fn test_empty_table_has_no_handlers() {
        assert!(DispatchTable::empty().handler(Intent::GetNews).is_none());
    }
}
