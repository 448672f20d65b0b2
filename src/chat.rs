//! The per-question pipeline: gate, news context, prompt, completion.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::llm::{build_providers, LlmProvider, ProviderKind};
use crate::news::resolver::NewsContextResolver;
use crate::news::NewsItem;
use crate::prompt::{compose, TemplateKind};
use crate::topic::{TopicGate, REFUSAL_MESSAGE};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub response: String,
    pub news_context: Vec<NewsItem>,
}

/// One provider's slot in a side-by-side comparison.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderOutcome {
    pub provider: ProviderKind,
    #[serde(flatten)]
    pub result: OutcomeResult,
    /// What the slot's panel shows.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeResult {
    Response(String),
    Error(String),
}

impl OutcomeResult {
    /// The answer, or `Error: <message>`.
    pub fn display_text(&self) -> String {
        match self {
            OutcomeResult::Response(text) => text.clone(),
            OutcomeResult::Error(message) => format!("Error: {}", message),
        }
    }
}

impl ProviderOutcome {
    pub fn new(provider: ProviderKind, result: OutcomeResult) -> Self {
        let text = result.display_text();
        ProviderOutcome { provider, result, text }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub responses: Vec<ProviderOutcome>,
    pub news_context: Vec<NewsItem>,
}

pub struct ChatService {
    gate: Option<TopicGate>,
    resolver: NewsContextResolver,
    template: TemplateKind,
    providers: Vec<Arc<dyn LlmProvider>>,
}

impl ChatService {
    pub fn new(
        gate: Option<TopicGate>,
        resolver: NewsContextResolver,
        template: TemplateKind,
        providers: Vec<Arc<dyn LlmProvider>>,
    ) -> Self {
        ChatService {
            gate,
            resolver,
            template,
            providers,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let gate = config.topic_gate.then(TopicGate::new);
        Self::new(
            gate,
            NewsContextResolver::from_config(&config.news),
            config.template,
            build_providers(&config.providers),
        )
    }

    pub fn resolver(&self) -> &NewsContextResolver {
        &self.resolver
    }

    fn provider(&self, kind: ProviderKind) -> Result<&Arc<dyn LlmProvider>> {
        self.providers
            .iter()
            .find(|p| p.kind() == kind)
            .ok_or_else(|| AppError::UnknownProvider(kind.slug().to_string()))
    }

    fn out_of_scope(&self, message: &str) -> bool {
        self.gate.as_ref().is_some_and(|gate| !gate.is_in_scope(message))
    }

    /// Answers `message` with a single provider.
    pub async fn answer(&self, kind: ProviderKind, message: &str) -> Result<ChatReply> {
        let message = validate(message)?;
        let provider = self.provider(kind)?;
        if !provider.configured() {
            return Err(kind.not_configured());
        }

        if self.out_of_scope(message) {
            info!(provider = %kind, "question rejected by topic gate");
            return Ok(refusal());
        }

        let context = self.resolver.resolve(message).await;
        let prompt = compose(message, &context, self.template);

        let started = Instant::now();
        let response = provider.complete(&prompt.text).await.map_err(|err| {
            warn!(provider = %kind, error = %err, "completion failed");
            AppError::LlmError(format!("Failed to get response from {}", kind.product()))
        })?;
        info!(provider = %kind, elapsed = ?started.elapsed(), "completion finished");

        Ok(ChatReply {
            response,
            news_context: context.into_items(),
        })
    }

    /// Asks every provider at once. News is resolved a single time and each
    /// provider's failure stays in its own slot.
    pub async fn compare(&self, message: &str) -> Result<Comparison> {
        let message = validate(message)?;

        if self.out_of_scope(message) {
            info!("question rejected by topic gate");
            let responses = self
                .providers
                .iter()
                .map(|p| ProviderOutcome::new(p.kind(), OutcomeResult::Response(REFUSAL_MESSAGE.to_string())))
                .collect();
            return Ok(Comparison {
                responses,
                news_context: Vec::new(),
            });
        }

        let context = self.resolver.resolve(message).await;
        let prompt = compose(message, &context, self.template);

        let calls = self.providers.iter().map(|provider| {
            let prompt = &prompt.text;
            async move {
                let kind = provider.kind();
                if !provider.configured() {
                    return ProviderOutcome::new(
                        kind,
                        OutcomeResult::Error(kind.not_configured().message().to_string()),
                    );
                }

                let started = Instant::now();
                let result = match provider.complete(prompt).await {
                    Ok(text) => OutcomeResult::Response(text),
                    Err(err) => {
                        warn!(provider = %kind, error = %err, "completion failed");
                        OutcomeResult::Error(err.message().to_string())
                    }
                };
                info!(provider = %kind, elapsed = ?started.elapsed(), "completion finished");
                ProviderOutcome::new(kind, result)
            }
        });
        let responses = join_all(calls).await;

        Ok(Comparison {
            responses,
            news_context: context.into_items(),
        })
    }
}

fn validate(message: &str) -> Result<&str> {
    if message.trim().is_empty() {
        return Err(AppError::BadRequest("Message is required".to_string()));
    }
    Ok(message)
}

fn refusal() -> ChatReply {
    ChatReply {
        response: REFUSAL_MESSAGE.to_string(),
        news_context: Vec::new(),
    }
}
