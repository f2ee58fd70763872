use async_trait::async_trait;
use tracing::{info, instrument};

use super::{HandlerOutcome, IntentHandler, capability};
use crate::gateways::Services;
use crate::messages;
use crate::models::{ClassifiedRequest, MapPin};
use crate::resolver::EntityResolver;
use crate::synthesizer::SynthesisTask;

/// `get_weather`: the place must resolve as a country; weather is sampled at
/// its capital, else its centroid. There is no general geocoding.
pub struct WeatherHandler;

#[async_trait]
impl IntentHandler for WeatherHandler {
    #[instrument(skip_all, name = "weather")]
    async fn handle(
        &self,
        request: &ClassifiedRequest,
        _text: &str,
        services: &Services,
    ) -> HandlerOutcome {
        let Some(place) = EntityResolver::weather_place(&request.entities) else {
            return HandlerOutcome::Unrecognized;
        };

        let country = match services.countries.lookup(&place).await {
            Ok(Some(country)) => country,
            Ok(None) => return HandlerOutcome::not_found(messages::location_not_found(&place)),
            Err(e) => return HandlerOutcome::unavailable(capability::COUNTRIES, &e),
        };
        let Some(coordinate) = country.weather_coordinate() else {
            return HandlerOutcome::not_found(messages::location_not_found(&place));
        };

        info!(
            "Fetching weather for {} at {}",
            country.common_name,
            coordinate.format_coordinates()
        );
        let weather = match services.weather.current(coordinate).await {
            Ok(weather) => weather,
            Err(e) => return HandlerOutcome::unavailable(capability::WEATHER, &e),
        };

        let label = if weather.location_label.is_empty() {
            country.common_name.clone()
        } else {
            weather.location_label.clone()
        };
        HandlerOutcome::synthesize(
            SynthesisTask::Weather {
                weather,
                place: country.common_name,
            },
            Some(MapPin::new(coordinate, label)),
        )
    }
}
