//! Language model access
//!
//! The model is used twice per turn at most: once to classify the message and
//! once to write the reply. Both go through [`LlmClient`] so tests can script
//! the model's answers.

use async_trait::async_trait;

use crate::Result;

pub mod openai_compatible;

pub use openai_compatible::OpenAiCompatibleClient;

/// One stateless completion round-trip
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send `user` with an optional `system` prompt and return the reply text
    async fn complete(&self, system: Option<&str>, user: &str) -> Result<String>;

    /// Model name for logging
    fn model_name(&self) -> &str;
}
