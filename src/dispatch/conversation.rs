//! Intents answered by the language model alone

use async_trait::async_trait;

use super::{HandlerOutcome, IntentHandler};
use crate::gateways::Services;
use crate::models::ClassifiedRequest;
use crate::synthesizer::SynthesisTask;

/// `travel_recommendation`: the user's stated preferences go straight to
/// synthesis
pub struct TravelHandler;

#[async_trait]
impl IntentHandler for TravelHandler {
    async fn handle(
        &self,
        request: &ClassifiedRequest,
        text: &str,
        _services: &Services,
    ) -> HandlerOutcome {
        HandlerOutcome::synthesize(
            SynthesisTask::Travel {
                preferences: request.entities.text("preferences").map(str::to_string),
                text: text.to_string(),
            },
            None,
        )
    }
}

pub struct GeneralChatHandler;

#[async_trait]
impl IntentHandler for GeneralChatHandler {
    async fn handle(
        &self,
        _request: &ClassifiedRequest,
        text: &str,
        _services: &Services,
    ) -> HandlerOutcome {
        HandlerOutcome::synthesize(
            SynthesisTask::GeneralChat {
                text: text.to_string(),
            },
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::test_support::{Stub, entities};
    use crate::models::Intent;

    #[tokio::test]
    async fn test_travel_forwards_preferences_without_fetching() {
        let (_, services) = Stub::default().services();
        let request = ClassifiedRequest::new(
            Intent::TravelRecommendation,
            entities(&[("preferences", "biển, mùa hè")]),
        );
        let outcome = TravelHandler
            .handle(&request, "Gợi ý nơi du lịch biển", &services)
            .await;
        assert_eq!(
            outcome,
            HandlerOutcome::synthesize(
                SynthesisTask::Travel {
                    preferences: Some("biển, mùa hè".to_string()),
                    text: "Gợi ý nơi du lịch biển".to_string(),
                },
                None
            )
        );
    }

    #[tokio::test]
    async fn test_general_chat_forwards_text() {
        let (_, services) = Stub::default().services();
        let request = ClassifiedRequest::new(Intent::GeneralChat, entities(&[]));
        let outcome = GeneralChatHandler
            .handle(&request, "Xin chào", &services)
            .await;
        assert_eq!(
            outcome,
            HandlerOutcome::synthesize(
                SynthesisTask::GeneralChat {
                    text: "Xin chào".to_string()
                },
                None
            )
        );
    }
}
