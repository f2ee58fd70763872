use async_trait::async_trait;
use tracing::{info, instrument};

use super::{HandlerOutcome, IntentHandler, capability};
use crate::gateways::Services;
use crate::messages;
use crate::models::{ClassifiedRequest, ExchangeRecord};
use crate::resolver::EntityResolver;
use crate::synthesizer::SynthesisTask;

/// `get_exchange_rate`: resolve a base code, fetch its table and pick the
/// requested target, USD or a capped spread, in that order
pub struct ExchangeRateHandler;

#[async_trait]
impl IntentHandler for ExchangeRateHandler {
    #[instrument(skip_all, name = "exchange_rate")]
    async fn handle(
        &self,
        request: &ClassifiedRequest,
        _text: &str,
        services: &Services,
    ) -> HandlerOutcome {
        let entities = &request.entities;
        let base =
            match EntityResolver::resolve_base_currency(entities, services.countries.as_ref()).await
            {
                Ok(Some(base)) => base,
                Ok(None) => return HandlerOutcome::Unrecognized,
                Err(e) => return HandlerOutcome::unavailable(capability::COUNTRIES, &e),
            };

        let table = match services.exchange.rates(&base).await {
            Ok(Some(table)) => table,
            Ok(None) => return HandlerOutcome::not_found(messages::currency_not_found(&base)),
            Err(e) => return HandlerOutcome::unavailable(capability::EXCHANGE, &e),
        };

        let target = EntityResolver::target_currency(entities);
        let record = ExchangeRecord::select(&table, &target);
        info!(
            base = %base,
            target = %target,
            tier = ?record.tier(),
            "Selected exchange rate"
        );
        HandlerOutcome::synthesize(SynthesisTask::Exchange { record }, None)
    }
}
