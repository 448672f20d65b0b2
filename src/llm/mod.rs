//! The chat-completion providers answering side by side. Each is an opaque
//! "prompt in, text out" capability behind [`LlmProvider`].

pub mod claude;
pub mod gemini;
pub mod openai;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Response;
use serde::Serialize;

use crate::config::ProvidersConfig;
use crate::error::{AppError, Result};

pub use claude::ClaudeClient;
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;

pub const MAX_TOKENS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Gemini,
    Claude,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [ProviderKind::OpenAi, ProviderKind::Gemini, ProviderKind::Claude];

    /// Path segment used by `/chat/{provider}`.
    pub fn slug(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Claude => "claude",
        }
    }

    /// Vendor name, as used in credential errors.
    pub fn vendor(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Gemini => "Gemini",
            ProviderKind::Claude => "Claude",
        }
    }

    /// Product name, as used in completion errors.
    pub fn product(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "ChatGPT",
            ProviderKind::Gemini => "Gemini",
            ProviderKind::Claude => "Claude",
        }
    }

    pub fn not_configured(&self) -> AppError {
        AppError::ConfigError(format!("{} API key not configured", self.vendor()))
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "chatgpt" => Ok(ProviderKind::OpenAi),
            "gemini" => Ok(ProviderKind::Gemini),
            "claude" | "anthropic" => Ok(ProviderKind::Claude),
            _ => Err(AppError::UnknownProvider(s.to_string())),
        }
    }
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Whether a usable credential is present.
    fn configured(&self) -> bool;

    async fn complete(&self, prompt: &str) -> Result<String>;
}

pub fn build_providers(config: &ProvidersConfig) -> Vec<Arc<dyn LlmProvider>> {
    vec![
        Arc::new(
            OpenAiClient::new(
                config.openai.api_key.clone(),
                config.openai.model.clone(),
                config.openai.base_url.clone(),
            )
            .with_attribution(config.openai_referer.clone(), config.openai_title.clone()),
        ),
        Arc::new(GeminiClient::new(
            config.gemini.api_key.clone(),
            config.gemini.model.clone(),
            config.gemini.base_url.clone(),
        )),
        Arc::new(ClaudeClient::new(
            config.claude.api_key.clone(),
            config.claude.model.clone(),
            config.claude.base_url.clone(),
        )),
    ]
}

/// Reads a provider body, turning a non-2xx status into an `LlmError` that
/// carries the provider's own error message when it sent one.
pub(crate) async fn read_json(kind: ProviderKind, response: Response) -> Result<serde_json::Value> {
    let status = response.status();
    let json: serde_json::Value = response
        .json()
        .await
        .map_err(|e| AppError::LlmError(format!("{} returned an unreadable body: {}", kind.vendor(), e)))?;

    if status.is_success() {
        return Ok(json);
    }

    let detail = json["error"]["message"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| json.to_string());
    Err(AppError::LlmError(format!("{} returned HTTP {}: {}", kind.vendor(), status, detail)))
}
