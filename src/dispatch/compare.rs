use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{HandlerOutcome, IntentHandler, capability};
use crate::gateways::Services;
use crate::messages;
use crate::models::ClassifiedRequest;
use crate::resolver::{CountrySlot, EntityResolver};
use crate::synthesizer::SynthesisTask;

/// `compare_countries`: exactly two names, fetched one after the other
pub struct CompareCountriesHandler;

#[async_trait]
impl IntentHandler for CompareCountriesHandler {
    #[instrument(skip_all, name = "compare_countries")]
    async fn handle(
        &self,
        request: &ClassifiedRequest,
        _text: &str,
        services: &Services,
    ) -> HandlerOutcome {
        let CountrySlot::Pair(first_name, second_name) =
            EntityResolver::country_slot(&request.entities)
        else {
            debug!("Comparison needs exactly two countries");
            return HandlerOutcome::Unrecognized;
        };

        let first = match services.countries.lookup(&first_name).await {
            Ok(record) => record,
            Err(e) => return HandlerOutcome::unavailable(capability::COUNTRIES, &e),
        };
        let second = match services.countries.lookup(&second_name).await {
            Ok(record) => record,
            Err(e) => return HandlerOutcome::unavailable(capability::COUNTRIES, &e),
        };

        match (first, second) {
            (Some(first), Some(second)) => HandlerOutcome::synthesize(
                SynthesisTask::Comparison {
                    first,
                    second,
                    criterion: request.entities.text("criteria").map(str::to_string),
                },
                None,
            ),
            (first, second) => {
                let missing: Vec<&str> = [
                    (first.is_none(), first_name.as_str()),
                    (second.is_none(), second_name.as_str()),
                ]
                .into_iter()
                .filter_map(|(missing, name)| missing.then_some(name))
                .collect();
                HandlerOutcome::not_found(messages::countries_not_found(&missing))
            }
        }
    }
}
