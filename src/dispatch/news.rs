use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{HandlerOutcome, IntentHandler, capability};
use crate::gateways::Services;
use crate::messages;
use crate::models::ClassifiedRequest;
use crate::resolver::EntityResolver;
use crate::synthesizer::SynthesisTask;

/// `get_news`: the country must resolve to an alpha-2 code before headlines
/// are requested
pub struct NewsHandler;

#[async_trait]
impl IntentHandler for NewsHandler {
    #[instrument(skip_all, name = "news")]
    async fn handle(
        &self,
        request: &ClassifiedRequest,
        _text: &str,
        services: &Services,
    ) -> HandlerOutcome {
        let Some(name) = EntityResolver::country_slot(&request.entities)
            .primary()
            .map(str::to_string)
        else {
            return HandlerOutcome::Unrecognized;
        };

        let country = match services.countries.lookup(&name).await {
            Ok(Some(country)) if !country.alpha2_code.is_empty() => country,
            Ok(_) => {
                debug!("No alpha-2 code for '{}', skipping news lookup", name);
                return HandlerOutcome::not_found(messages::country_not_found(&name));
            }
            Err(e) => return HandlerOutcome::unavailable(capability::COUNTRIES, &e),
        };

        let digest = match services.news.top_headlines(&country.alpha2_code).await {
            Ok(digest) => digest,
            Err(e) => return HandlerOutcome::unavailable(capability::NEWS, &e),
        };
        if digest.is_empty() {
            return HandlerOutcome::not_found(messages::no_news(&country.common_name));
        }

        debug!("{} headlines for {}", digest.len(), country.alpha2_code);
        HandlerOutcome::synthesize(
            SynthesisTask::News {
                country: country.common_name,
                digest,
            },
            None,
        )
    }
}
