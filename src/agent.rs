//! The per-turn pipeline: classify, dispatch, synthesize, post-process
//!
//! A turn never fails. Each degraded path is recorded in the [`TurnReport`]
//! so callers and tests can see which route produced the reply.

use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::Result;
use crate::classifier::{Classifier, LlmClassifier};
use crate::config::AgentConfig;
use crate::dispatch::{DispatchTable, HandlerOutcome, TerminalKind};
use crate::gateways::Services;
use crate::llm::{LlmClient, OpenAiCompatibleClient};
use crate::messages;
use crate::models::{
    ChatTurnResult, ClassifiedRequest, Entities, ExchangeTier, Intent, MapPin,
};
use crate::postprocess::strip_emphasis;
use crate::synthesizer::{LlmSynthesizer, SynthesisTask, Synthesizer};

/// Route a turn took through the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPath {
    /// The intent's handler produced data for synthesis
    Handled,
    NotFound,
    Unavailable,
    /// Unrecognized intent or a missing required entity
    Clarification,
    /// Classifier output could not be parsed; answered as general chat
    ClassifierFallback,
}

/// Who wrote the reply text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Llm,
    /// Deterministic rendering after synthesis failed
    Template,
    /// Fixed message, no synthesis attempted
    Direct,
}

/// Outcome of one turn with the route that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnReport {
    pub intent: Intent,
    pub path: DispatchPath,
    pub reply_source: ReplySource,
    pub exchange_tier: Option<ExchangeTier>,
    pub result: ChatTurnResult,
}

/// Conversational agent wired to its gateways and language model seams
pub struct ChatAgent {
    services: Services,
    classifier: Arc<dyn Classifier>,
    synthesizer: Arc<dyn Synthesizer>,
    table: DispatchTable,
}

impl ChatAgent {
    pub fn new(
        services: Services,
        classifier: Arc<dyn Classifier>,
        synthesizer: Arc<dyn Synthesizer>,
    ) -> Self {
        Self {
            services,
            classifier,
            synthesizer,
            table: DispatchTable::standard(),
        }
    }

    /// Production agent: HTTP gateways and one shared language model client
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        let services = Services::from_config(config)?;
        let llm: Arc<dyn LlmClient> = Arc::new(OpenAiCompatibleClient::new(&config.llm)?);
        info!("Using language model {}", llm.model_name());

        Ok(Self::new(
            services,
            Arc::new(LlmClassifier::new(llm.clone())),
            Arc::new(LlmSynthesizer::new(llm)),
        ))
    }

    #[must_use]
    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Run one user turn to completion
    #[instrument(skip_all, fields(message_len = text.len()))]
    pub async fn handle_turn(&self, text: &str) -> TurnReport {
        let start_time = Instant::now();
        let text = text.trim();
        if text.is_empty() {
            return TurnReport {
                intent: Intent::Unrecognized,
                path: DispatchPath::Clarification,
                reply_source: ReplySource::Direct,
                exchange_tier: None,
                result: ChatTurnResult::new(messages::EMPTY_MESSAGE.to_string(), None),
            };
        }

        let (request, classified) = match self.classifier.classify(text).await {
            Ok(request) => (request, true),
            Err(e) => {
                warn!(error = %e, "Classification failed, answering as general chat");
                (
                    ClassifiedRequest::new(Intent::GeneralChat, Entities::default()),
                    false,
                )
            }
        };

        let outcome = if classified {
            match self.table.handler(request.intent) {
                Some(handler) => handler.handle(&request, text, &self.services).await,
                None => HandlerOutcome::Unrecognized,
            }
        } else {
            HandlerOutcome::synthesize(
                SynthesisTask::GeneralChat {
                    text: text.to_string(),
                },
                None,
            )
        };

        let report = match outcome {
            HandlerOutcome::Synthesize { task, map } => {
                let path = if classified {
                    DispatchPath::Handled
                } else {
                    DispatchPath::ClassifierFallback
                };
                self.finish_with_synthesis(request.intent, path, task, map)
                    .await
            }
            HandlerOutcome::Terminal(reply) => {
                let path = match reply.kind {
                    TerminalKind::NotFound => DispatchPath::NotFound,
                    TerminalKind::Unavailable => DispatchPath::Unavailable,
                };
                TurnReport {
                    intent: request.intent,
                    path,
                    reply_source: ReplySource::Direct,
                    exchange_tier: None,
                    result: ChatTurnResult::new(finalize(&reply.message, None), None),
                }
            }
            HandlerOutcome::Unrecognized => {
                info!(intent = %request.intent, "Asking the user to clarify");
                let task = SynthesisTask::Clarify {
                    text: text.to_string(),
                };
                self.finish_with_synthesis(request.intent, DispatchPath::Clarification, task, None)
                    .await
            }
        };

        info!(
            intent = %report.intent,
            path = ?report.path,
            source = ?report.reply_source,
            "Turn completed in {:.3}s",
            start_time.elapsed().as_secs_f64()
        );
        report
    }

    async fn finish_with_synthesis(
        &self,
        intent: Intent,
        path: DispatchPath,
        task: SynthesisTask,
        map: Option<MapPin>,
    ) -> TurnReport {
        let (text, reply_source) = match self.synthesizer.synthesize(&task).await {
            Ok(text) => (ensure_note(text, task.required_note()), ReplySource::Llm),
            Err(e) => {
                warn!(task = task.kind(), error = %e, "Synthesis failed, using template reply");
                (task.fallback_text(), ReplySource::Template)
            }
        };

        let exchange_tier = match &task {
            SynthesisTask::Exchange { record } => Some(record.tier()),
            _ => None,
        };

        let reply = finalize(&text, Some(&task));
        TurnReport {
            intent,
            path,
            reply_source,
            exchange_tier,
            result: ChatTurnResult::new(reply, map),
        }
    }
}

/// Append the task's mandatory note when the model left it out
fn ensure_note(text: String, note: Option<&str>) -> String {
    match note {
        Some(note) if !text.contains(note) => format!("{note}\n{text}"),
        _ => text,
    }
}

/// Strip emphasis; a reply that ends up empty is replaced by the template
fn finalize(text: &str, task: Option<&SynthesisTask>) -> String {
    let cleaned = strip_emphasis(text);
    if !cleaned.is_empty() {
        return cleaned;
    }
    let fallback = task
        .map(|task| strip_emphasis(&task.fallback_text()))
        .unwrap_or_default();
    if fallback.is_empty() {
        messages::CLARIFY.to_string()
    } else {
        fallback
    }
}
