use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    AgentError, VERSION,
    agent::ChatAgent,
    messages,
    models::{ChatTurnResult, CountryRecord},
};

type ApiError = (StatusCode, Json<ApiErrorBody>);

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ApiErrorBody {
            error: message.into(),
        }),
    )
}

/// Validation failures are the caller's fault; anything else came from a provider
fn rejected(e: &AgentError) -> ApiError {
    let status = match e {
        AgentError::Validation { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    };
    api_error(status, e.user_message())
}

/// Trimmed, non-blank input or a validation error carrying `message`
fn required_text(value: Option<&str>, message: &str) -> crate::Result<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AgentError::validation(message))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct CountryQuery {
    pub country_name: Option<String>,
}

/// Flat country summary served by `/get_country_info`
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiCountrySummary {
    pub name: String,
    pub capital: String,
    pub population: u64,
    pub region: String,
    pub subregion: String,
    pub currency: String,
    pub language: String,
}

impl From<&CountryRecord> for ApiCountrySummary {
    fn from(country: &CountryRecord) -> Self {
        let or_unknown = |value: String| {
            if value.is_empty() {
                messages::NO_INFORMATION.to_string()
            } else {
                value
            }
        };
        Self {
            name: country.common_name.clone(),
            capital: country
                .capital_name()
                .unwrap_or(messages::NO_INFORMATION)
                .to_string(),
            population: country.population,
            region: or_unknown(country.region.clone()),
            subregion: or_unknown(country.subregion.clone().unwrap_or_default()),
            currency: or_unknown(country.currency_list()),
            language: or_unknown(country.language_list()),
        }
    }
}

pub fn router(agent: Arc<ChatAgent>) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/get_country_info", get(get_country_info))
        .with_state(agent)
}

async fn welcome() -> &'static str {
    messages::WELCOME
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: VERSION.to_string(),
    })
}

async fn chat(
    State(agent): State<Arc<ChatAgent>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatTurnResult>, ApiError> {
    let message = required_text(Some(&payload.message), messages::EMPTY_MESSAGE)
        .map_err(|e| rejected(&e))?;

    let report = agent.handle_turn(&message).await;
    Ok(Json(report.result))
}

async fn get_country_info(
    State(agent): State<Arc<ChatAgent>>,
    Query(query): Query<CountryQuery>,
) -> Result<Json<ApiCountrySummary>, ApiError> {
    let name = required_text(query.country_name.as_deref(), messages::COUNTRY_NAME_REQUIRED)
        .map_err(|e| rejected(&e))?;

    match agent.services().countries.lookup(&name).await {
        Ok(Some(country)) => {
            info!("Serving country summary for {}", country.common_name);
            Ok(Json(ApiCountrySummary::from(&country)))
        }
        Ok(None) => Err(api_error(
            StatusCode::NOT_FOUND,
            messages::country_not_found(&name),
        )),
        Err(e) => {
            warn!(error = %e, "Country lookup failed");
            Err(rejected(&e))
        }
    }
}
