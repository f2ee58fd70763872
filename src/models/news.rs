//! Headline digest model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Most headlines ever kept for one reply
pub const MAX_HEADLINES: usize = 5;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NewsArticle {
    pub title: String,
    pub url: String,
    /// Publisher display name
    pub source: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// Up to [`MAX_HEADLINES`] articles in provider order
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct NewsDigest {
    articles: Vec<NewsArticle>,
}

impl NewsDigest {
    /// Keep the first [`MAX_HEADLINES`] articles, dropping the rest
    #[must_use]
    pub fn from_provider_order(articles: impl IntoIterator<Item = NewsArticle>) -> Self {
        Self {
            articles: articles.into_iter().take(MAX_HEADLINES).collect(),
        }
    }

    #[must_use]
    pub fn articles(&self) -> &[NewsArticle] {
        &self.articles
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.articles.len()
    }
}
