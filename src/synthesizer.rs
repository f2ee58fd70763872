//! Response synthesis
//!
//! Every data-backed reply is first offered to the language model with a
//! task-specific instruction and the fetched records as JSON. When that call
//! fails the same task renders a deterministic reply straight from the record
//! fields, so a turn with data never ends without an answer.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::llm::LlmClient;
use crate::messages;
use crate::models::{CountryRecord, ExchangeRecord, NewsDigest, WeatherRecord};
use crate::{AgentError, Result};

const STYLE_DIRECTIVE: &str = "You are a friendly assistant that answers questions about countries. \
Answer in the same language as the user's message (Vietnamese unless the user wrote in another language). \
Use short bullet points starting with '- '. Never use bold or other emphasis markup such as ** or __. \
Only state facts present in the data you are given.";

/// What the synthesizer is asked to write, with the records it may use
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisTask {
    CountryInfo {
        country: CountryRecord,
        criterion: Option<String>,
    },
    Comparison {
        first: CountryRecord,
        second: CountryRecord,
        criterion: Option<String>,
    },
    Weather {
        weather: WeatherRecord,
        place: String,
    },
    Exchange {
        record: ExchangeRecord,
    },
    News {
        country: String,
        digest: NewsDigest,
    },
    Travel {
        preferences: Option<String>,
        text: String,
    },
    GeneralChat {
        text: String,
    },
    /// The request was not understood or lacked a required detail
    Clarify {
        text: String,
    },
}

impl SynthesisTask {
    /// Short name for logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SynthesisTask::CountryInfo { .. } => "country_info",
            SynthesisTask::Comparison { .. } => "comparison",
            SynthesisTask::Weather { .. } => "weather",
            SynthesisTask::Exchange { .. } => "exchange",
            SynthesisTask::News { .. } => "news",
            SynthesisTask::Travel { .. } => "travel",
            SynthesisTask::GeneralChat { .. } => "general_chat",
            SynthesisTask::Clarify { .. } => "clarify",
        }
    }

    /// Text that must appear in the final reply whoever writes it
    #[must_use]
    pub fn required_note(&self) -> Option<&str> {
        match self {
            SynthesisTask::Exchange { record } => record.note(),
            _ => None,
        }
    }

    fn instruction(&self) -> String {
        match self {
            SynthesisTask::CountryInfo { criterion, .. } => match criterion {
                Some(criterion) => format!(
                    "The user asked about '{criterion}' for this country. Answer that first, then add a brief overview."
                ),
                None => "Give a concise overview of this country: capital, population, area, region, languages and currency.".to_string(),
            },
            SynthesisTask::Comparison { criterion, .. } => match criterion {
                Some(criterion) => format!(
                    "Compare these two countries, focusing on '{criterion}', then summarise the main differences."
                ),
                None => "Compare these two countries point by point: population, area, region, languages and currency.".to_string(),
            },
            SynthesisTask::Weather { .. } => {
                "Describe the current weather: conditions, temperature, feels-like temperature, humidity and wind.".to_string()
            }
            SynthesisTask::Exchange { .. } => {
                "Report the exchange rate data. If a note is present, include it verbatim.".to_string()
            }
            SynthesisTask::News { .. } => {
                "List these headlines in the given order, one bullet each with its source and link.".to_string()
            }
            SynthesisTask::Travel { .. } => {
                "Suggest a few travel destinations that match the user's preferences, with one reason for each.".to_string()
            }
            SynthesisTask::GeneralChat { .. } => "Reply conversationally to the user's message.".to_string(),
            SynthesisTask::Clarify { .. } => {
                "The request could not be understood or is missing details. Politely ask the user to clarify, \
mentioning that you can look up country facts, comparisons, weather, exchange rates and news."
                    .to_string()
            }
        }
    }

    fn data(&self) -> Value {
        match self {
            SynthesisTask::CountryInfo { country, .. } => json!({ "country": country }),
            SynthesisTask::Comparison { first, second, .. } => {
                json!({ "countries": [first, second] })
            }
            SynthesisTask::Weather { weather, place } => {
                json!({ "place": place, "weather": weather })
            }
            SynthesisTask::Exchange { record } => json!({ "exchange": record }),
            SynthesisTask::News { country, digest } => {
                json!({ "country": country, "articles": digest.articles() })
            }
            SynthesisTask::Travel { preferences, text } => {
                json!({ "preferences": preferences, "message": text })
            }
            SynthesisTask::GeneralChat { text } | SynthesisTask::Clarify { text } => {
                json!({ "message": text })
            }
        }
    }

    /// The user prompt sent with [`STYLE_DIRECTIVE`]
    fn prompt(&self) -> String {
        format!("{}\n\nData:\n{:#}", self.instruction(), self.data())
    }

    /// Deterministic reply built only from the task's own fields
    #[must_use]
    pub fn fallback_text(&self) -> String {
        match self {
            SynthesisTask::CountryInfo { country, .. } => country_summary(country),
            SynthesisTask::Comparison { first, second, .. } => comparison_summary(first, second),
            SynthesisTask::Weather { weather, place } => weather_summary(weather, place),
            SynthesisTask::Exchange { record } => exchange_summary(record),
            SynthesisTask::News { country, digest } => news_summary(country, digest),
            SynthesisTask::Travel { .. } => messages::TRAVEL_UNAVAILABLE.to_string(),
            SynthesisTask::GeneralChat { .. } => messages::GENERAL_CHAT.to_string(),
            SynthesisTask::Clarify { .. } => messages::CLARIFY.to_string(),
        }
    }
}

/// Writes reply text for a [`SynthesisTask`]
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, task: &SynthesisTask) -> Result<String>;
}

/// [`Synthesizer`] backed by the language model
pub struct LlmSynthesizer {
    llm: Arc<dyn LlmClient>,
}

impl LlmSynthesizer {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Synthesizer for LlmSynthesizer {
    #[instrument(skip_all, fields(task = task.kind(), model = self.llm.model_name()))]
    async fn synthesize(&self, task: &SynthesisTask) -> Result<String> {
        let prompt = task.prompt();
        debug!(prompt_len = prompt.len(), "Requesting synthesis");

        let reply = self.llm.complete(Some(STYLE_DIRECTIVE), &prompt).await?;
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(AgentError::llm("synthesis returned no text"));
        }
        Ok(reply.to_string())
    }
}

/// `97338583` as `97.338.583`
#[must_use]
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    grouped
}

fn format_area(area: Option<f64>) -> String {
    match area {
        Some(area) if area.is_finite() && area >= 0.0 => {
            format!("{} km²", group_thousands(area.round() as u64))
        }
        _ => messages::NO_INFORMATION.to_string(),
    }
}

fn format_rate(rate: f64) -> String {
    if rate >= 1.0 {
        format!("{rate:.2}")
    } else {
        format!("{rate:.6}")
    }
}

fn or_unknown(value: String) -> String {
    if value.is_empty() {
        messages::NO_INFORMATION.to_string()
    } else {
        value
    }
}

fn region_line(country: &CountryRecord) -> String {
    match &country.subregion {
        Some(subregion) => format!("{} ({subregion})", country.region),
        None => or_unknown(country.region.clone()),
    }
}

fn country_summary(country: &CountryRecord) -> String {
    let lines = [
        format!(
            "Thông tin về {} ({}):",
            country.common_name, country.official_name
        ),
        format!(
            "- Thủ đô: {}",
            country.capital_name().unwrap_or(messages::NO_INFORMATION)
        ),
        format!("- Dân số: {}", group_thousands(country.population)),
        format!("- Diện tích: {}", format_area(country.area)),
        format!("- Khu vực: {}", region_line(country)),
        format!("- Ngôn ngữ: {}", or_unknown(country.language_list())),
        format!("- Tiền tệ: {}", or_unknown(country.currency_list())),
    ];
    lines.join("\n")
}

fn comparison_summary(first: &CountryRecord, second: &CountryRecord) -> String {
    let row = |label: &str, a: String, b: String| {
        format!(
            "- {label}: {} {a} | {} {b}",
            first.common_name, second.common_name
        )
    };
    let lines = [
        format!(
            "So sánh {} và {}:",
            first.common_name, second.common_name
        ),
        row(
            "Thủ đô",
            first.capital_name().unwrap_or(messages::NO_INFORMATION).to_string(),
            second.capital_name().unwrap_or(messages::NO_INFORMATION).to_string(),
        ),
        row(
            "Dân số",
            group_thousands(first.population),
            group_thousands(second.population),
        ),
        row("Diện tích", format_area(first.area), format_area(second.area)),
        row("Khu vực", region_line(first), region_line(second)),
        row(
            "Ngôn ngữ",
            or_unknown(first.language_list()),
            or_unknown(second.language_list()),
        ),
        row(
            "Tiền tệ",
            or_unknown(first.currency_list()),
            or_unknown(second.currency_list()),
        ),
    ];
    lines.join("\n")
}

fn weather_summary(weather: &WeatherRecord, place: &str) -> String {
    let location = if weather.location_label.is_empty() {
        place
    } else {
        weather.location_label.as_str()
    };
    [
        format!("Thời tiết hiện tại ở {location} ({place}):"),
        format!("- Trạng thái: {}", weather.description),
        format!(
            "- Nhiệt độ: {} (cảm giác như {})",
            weather.format_temperature(),
            weather.format_feels_like()
        ),
        format!("- Độ ẩm: {}%", weather.humidity_pct),
        format!("- Gió: {}", weather.format_wind()),
    ]
    .join("\n")
}

fn exchange_summary(record: &ExchangeRecord) -> String {
    match record {
        ExchangeRecord::Pair {
            base,
            target,
            rate,
            note,
        } => {
            let line = format!("- Tỷ giá: 1 {base} = {} {target}", format_rate(*rate));
            match note {
                Some(note) => format!("{note}\n{line}"),
                None => line,
            }
        }
        ExchangeRecord::Spread { base, rates, note } => {
            let mut lines = vec![note.clone()];
            lines.extend(
                rates
                    .iter()
                    .map(|(code, rate)| format!("- 1 {base} = {} {code}", format_rate(*rate))),
            );
            lines.join("\n")
        }
    }
}

fn news_summary(country: &str, digest: &NewsDigest) -> String {
    let mut lines = vec![format!("Tin tức nổi bật tại {country}:")];
    for article in digest.articles() {
        let date = article
            .published_at
            .map(|at| format!(", {}", at.format("%d/%m/%Y")))
            .unwrap_or_default();
        lines.push(format!(
            "- {} ({}{date}): {}",
            article.title, article.source, article.url
        ));
    }
    lines.join("\n")
}
