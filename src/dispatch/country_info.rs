use async_trait::async_trait;
use tracing::{info, instrument};

use super::{HandlerOutcome, IntentHandler, capability};
use crate::gateways::Services;
use crate::messages;
use crate::models::ClassifiedRequest;
use crate::resolver::EntityResolver;
use crate::synthesizer::SynthesisTask;

/// `get_country_info`: one country record plus the asked-about criterion
pub struct CountryInfoHandler;

#[async_trait]
impl IntentHandler for CountryInfoHandler {
    #[instrument(skip_all, name = "country_info")]
    async fn handle(
        &self,
        request: &ClassifiedRequest,
        _text: &str,
        services: &Services,
    ) -> HandlerOutcome {
        let entities = &request.entities;
        let Some(name) = EntityResolver::country_slot(entities)
            .primary()
            .map(str::to_string)
        else {
            return HandlerOutcome::Unrecognized;
        };

        match services.countries.lookup(&name).await {
            Ok(Some(country)) => {
                info!("Found country '{}'", country.common_name);
                let map = country.map_pin();
                HandlerOutcome::synthesize(
                    SynthesisTask::CountryInfo {
                        country,
                        criterion: entities.text("criteria").map(str::to_string),
                    },
                    map,
                )
            }
            Ok(None) => HandlerOutcome::not_found(messages::country_not_found(&name)),
            Err(e) => HandlerOutcome::unavailable(capability::COUNTRIES, &e),
        }
    }
}
