use async_trait::async_trait;
use serde::Serialize;

use super::{read_json, LlmProvider, ProviderKind, MAX_TOKENS};
use crate::error::{AppError, Result};
use crate::http::LLM_CLIENT;

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

pub struct ClaudeClient {
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl ClaudeClient {
    pub fn new(api_key: Option<String>, model: String, base_url: String) -> Self {
        ClaudeClient { api_key, model, base_url }
    }
}

#[async_trait]
impl LlmProvider for ClaudeClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Claude
    }

    fn configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| self.kind().not_configured())?;

        let body = MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user".into(),
                content: prompt.into(),
            }],
        };

        let res = LLM_CLIENT
            .post(format!("{}/v1/messages", self.base_url.trim_end_matches('/')))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;
        let json = read_json(self.kind(), res).await?;

        // Only text blocks count; anything else yields an empty answer.
        let blocks = json["content"]
            .as_array()
            .ok_or_else(|| AppError::LlmError("Invalid response format from Claude".to_string()))?;
        let reply = blocks
            .iter()
            .find(|block| block["type"] == "text")
            .and_then(|block| block["text"].as_str())
            .unwrap_or_default()
            .to_string();

        Ok(reply)
    }
}
