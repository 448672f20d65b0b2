use async_trait::async_trait;
use serde::Serialize;

use super::{read_json, LlmProvider, ProviderKind, MAX_TOKENS};
use crate::error::{AppError, Result};
use crate::http::LLM_CLIENT;

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

/// Any OpenAI-compatible `/chat/completions` endpoint (OpenAI itself,
/// OpenRouter, local gateways).
pub struct OpenAiClient {
    api_key: Option<String>,
    model: String,
    base_url: String,
    site_url: Option<String>,
    site_name: Option<String>,
}

impl OpenAiClient {
    pub fn new(api_key: Option<String>, model: String, base_url: String) -> Self {
        OpenAiClient {
            api_key,
            model,
            base_url,
            site_url: None,
            site_name: None,
        }
    }

    pub fn with_attribution(mut self, site_url: Option<String>, site_name: Option<String>) -> Self {
        self.site_url = site_url;
        self.site_name = site_name;
        self
    }
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| self.kind().not_configured())?;

        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".into(),
                content: prompt.into(),
            }],
            max_tokens: MAX_TOKENS,
            temperature: 0.7,
        };

        let mut request = LLM_CLIENT
            .post(format!("{}/chat/completions", self.base_url.trim_end_matches('/')))
            .bearer_auth(api_key)
            .json(&body);

        // Add optional headers if provided
        if let Some(url) = &self.site_url {
            request = request.header("HTTP-Referer", url);
        }

        if let Some(name) = &self.site_name {
            request = request.header("X-Title", name);
        }

        let res = request.send().await?;
        let json = read_json(self.kind(), res).await?;

        let reply = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| AppError::LlmError("Invalid response format from OpenAI".to_string()))?
            .to_string();

        Ok(reply)
    }
}
