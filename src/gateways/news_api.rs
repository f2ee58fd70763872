//! NewsAPI top-headlines client

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument};

use super::NewsGateway;
use super::http::{self, Fetched};
use crate::config::NewsConfig;
use crate::models::{NewsArticle, NewsDigest};
use crate::{AgentError, Result};

const SERVICE: &str = "NewsAPI";

pub struct NewsApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl NewsApiClient {
    pub fn new(config: &NewsConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config.timeout_seconds)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl NewsGateway for NewsApiClient {
    #[instrument(skip(self))]
    async fn top_headlines(&self, alpha2_code: &str) -> Result<NewsDigest> {
        let api_key = http::require_key(self.api_key.as_deref(), SERVICE)?;
        let query = format!(
            "{}/top-headlines?country={}",
            self.base_url,
            urlencoding::encode(&alpha2_code.trim().to_lowercase())
        );
        let url = format!("{query}&apiKey={}", urlencoding::encode(api_key));

        let fetched: Fetched<HeadlinesResponse> =
            http::get_json(&self.client, SERVICE, &url, &query).await?;
        let response = match fetched {
            Fetched::Found(response) => response,
            Fetched::NotFound => return Ok(NewsDigest::default()),
        };

        let digest = response.into_digest()?;
        info!("Fetched {} headlines for {}", digest.len(), alpha2_code);
        Ok(digest)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct HeadlinesResponse {
    status: String,
    message: Option<String>,
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    title: Option<String>,
    url: Option<String>,
    source: Option<RawSource>,
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    name: Option<String>,
}

impl HeadlinesResponse {
    fn into_digest(self) -> Result<NewsDigest> {
        if self.status != "ok" {
            let message = self.message.unwrap_or_else(|| self.status.clone());
            return Err(AgentError::api(format!("{SERVICE} error: {message}")));
        }

        let articles = self.articles.into_iter().filter_map(|raw| {
            let title = raw.title.filter(|t| !t.trim().is_empty())?;
            Some(NewsArticle {
                title,
                url: raw.url.unwrap_or_default(),
                source: raw.source.and_then(|s| s.name).unwrap_or_default(),
                published_at: raw
                    .published_at
                    .as_deref()
                    .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
                    .map(|ts| ts.with_timezone(&Utc)),
            })
        });
        Ok(NewsDigest::from_provider_order(articles))
    }
}
