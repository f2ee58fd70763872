//! Shared HTTP plumbing for the data gateways
//!
//! One GET per call, no retries. A 404 is reported as "not found" so each
//! gateway can turn it into `Ok(None)`; every other non-success status and
//! every transport or decode failure becomes [`AgentError::Api`].

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::{AgentError, Result};

const USER_AGENT: &str = concat!("country-agent/", env!("CARGO_PKG_VERSION"));

/// Responses slower than this are logged as warnings
const SLOW_RESPONSE: Duration = Duration::from_secs(5);

/// Build a client with the provider's timeout
pub fn build_client(timeout_seconds: u32) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds.into()))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| AgentError::api(format!("Failed to create HTTP client: {e}")))
}

/// Outcome of a provider GET
#[derive(Debug)]
pub enum Fetched<T> {
    Found(T),
    NotFound,
}

/// GET `url` and decode the JSON body
///
/// `service` names the provider in logs and errors; `redacted_url` is what gets
/// logged, so keys embedded in the query or path never reach the log.
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    service: &str,
    url: &str,
    redacted_url: &str,
) -> Result<Fetched<T>> {
    debug!(service, url = redacted_url, "Sending provider request");
    let start_time = Instant::now();

    // reqwest errors carry the request URL, which may hold the key
    let response = client.get(url).send().await.map_err(|e| {
        let e = e.without_url();
        warn!(service, url = redacted_url, error = %e, "Network error calling provider");
        AgentError::api(format!("{service} request failed: {e}"))
    })?;

    let status = response.status();
    let elapsed = start_time.elapsed();
    if elapsed > SLOW_RESPONSE {
        warn!(service, "Slow API response detected: {:.3}s", elapsed.as_secs_f64());
    }

    if status == StatusCode::NOT_FOUND {
        info!(service, "Provider reported not found (HTTP 404)");
        return Ok(Fetched::NotFound);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!(service, %status, "Provider returned an error status");
        return Err(match status.as_u16() {
            401 | 403 => AgentError::api(format!(
                "{service} rejected the API key (HTTP {})",
                status.as_u16()
            )),
            429 => AgentError::api(format!("{service} rate limit exceeded")),
            _ => AgentError::api(format!(
                "{service} error {status}: {}",
                body.chars().take(200).collect::<String>()
            )),
        });
    }

    let parsed = response.json::<T>().await.map_err(|e| {
        let e = e.without_url();
        error!(service, error = %e, "Failed to parse provider response");
        AgentError::api(format!("Invalid data received from {service}: {e}"))
    })?;

    info!(
        service,
        "Successful API request in {:.3}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(Fetched::Found(parsed))
}

/// A provider key, or a configuration error naming the provider
pub fn require_key<'a>(key: Option<&'a str>, service: &str) -> Result<&'a str> {
    key.ok_or_else(|| AgentError::config(format!("No API key configured for {service}")))
}
