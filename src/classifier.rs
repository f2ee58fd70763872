//! Intent classification
//!
//! Sends the user's message to the language model together with the intent
//! taxonomy and its entity slots, then parses the model's JSON answer. Models
//! often wrap JSON in a markdown fence or leave trailing commas; both are
//! repaired before parsing. Anything still unparseable is an
//! [`AgentError::Parse`], which the agent answers as plain conversation.

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, instrument, warn};

use crate::llm::LlmClient;
use crate::models::{ClassifiedRequest, Entities, Intent};
use crate::{AgentError, Result};

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[}\]])").expect("trailing comma pattern is valid"));

const CLASSIFIER_PROMPT: &str = r#"You classify messages sent to an assistant that answers questions about countries.
Reply with a single JSON object and nothing else:
{"intent": "<intent>", "entities": {<slots>}}

Intents and their entity slots:
- get_country_info: "country" (English country name), "criteria" (optional: the fact asked about, e.g. population, capital)
- compare_countries: "country" (array of exactly two English country names), "criteria" (optional)
- get_weather: "location" (English country name)
- get_exchange_rate: "country" (optional: English name of the country whose currency is meant), "currency" (optional: currency code or name), "target_currency" (optional: 3-letter code to convert into)
- get_news: "country" (English country name)
- travel_recommendation: "preferences" (what the traveller wants, in their own words)
- general_chat: no entities

Examples:
"dân số Việt Nam" -> {"intent": "get_country_info", "entities": {"country": "Vietnam", "criteria": "dân số"}}
"So sánh Nhật Bản và Hàn Quốc" -> {"intent": "compare_countries", "entities": {"country": ["Japan", "South Korea"]}}
"Thời tiết ở Pháp thế nào?" -> {"intent": "get_weather", "entities": {"location": "France"}}
"Tỷ giá tiền Thái Lan" -> {"intent": "get_exchange_rate", "entities": {"country": "Thailand"}}
"1 EUR bằng bao nhiêu yên?" -> {"intent": "get_exchange_rate", "entities": {"currency": "EUR", "target_currency": "JPY"}}
"Tin tức mới nhất ở Đức" -> {"intent": "get_news", "entities": {"country": "Germany"}}
"Gợi ý nơi du lịch biển vào mùa hè" -> {"intent": "travel_recommendation", "entities": {"preferences": "biển, mùa hè"}}
"Xin chào" -> {"intent": "general_chat", "entities": {}}

Omit any slot you cannot fill. Do not add explanations."#;

/// Turns a raw user message into an intent and entity slots
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<ClassifiedRequest>;
}

/// [`Classifier`] backed by the language model
pub struct LlmClassifier {
    llm: Arc<dyn LlmClient>,
}

impl LlmClassifier {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Classifier for LlmClassifier {
    #[instrument(skip_all, fields(model = self.llm.model_name()))]
    async fn classify(&self, text: &str) -> Result<ClassifiedRequest> {
        let raw = self.llm.complete(Some(CLASSIFIER_PROMPT), text).await?;
        debug!(raw = %raw, "classifier output");

        let request = parse_classification(&raw).inspect_err(|e| {
            warn!(error = %e, "Classifier output could not be parsed");
        })?;
        info!(intent = %request.intent, "Classified message");
        Ok(request)
    }
}

#[derive(Debug, Deserialize)]
struct RawClassification {
    intent: String,
    #[serde(default)]
    entities: BTreeMap<String, Value>,
}

/// Parse model output into a [`ClassifiedRequest`], repairing fences and
/// trailing commas first
pub fn parse_classification(raw: &str) -> Result<ClassifiedRequest> {
    let json = repair_json(raw);
    let parsed: RawClassification = serde_json::from_str(&json)
        .map_err(|e| AgentError::parse(format!("classifier output is not valid JSON: {e}")))?;

    Ok(ClassifiedRequest::new(
        Intent::from_label(&parsed.intent),
        Entities::from_json(parsed.entities),
    ))
}

/// Strip a surrounding markdown fence, cut to the outermost object and drop
/// trailing commas
fn repair_json(raw: &str) -> String {
    let cleaned = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```JSON")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let object = match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if end > start => &cleaned[start..=end],
        _ => cleaned,
    };

    TRAILING_COMMA.replace_all(object, "$1").into_owned()
}
