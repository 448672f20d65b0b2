use async_trait::async_trait;
use serde::Serialize;

use super::{read_json, LlmProvider, ProviderKind, MAX_TOKENS};
use crate::error::{AppError, Result};
use crate::http::LLM_CLIENT;

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

pub struct GeminiClient {
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: String, base_url: String) -> Self {
        GeminiClient { api_key, model, base_url }
    }
}

#[async_trait]
impl LlmProvider for GeminiClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| self.kind().not_configured())?;

        let model = self.model.trim_start_matches("models/");
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        );
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user".into(),
                parts: vec![Part { text: prompt.into() }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: MAX_TOKENS,
            },
        };

        let res = LLM_CLIENT
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;
        let json = read_json(self.kind(), res).await?;

        // A response can be split across several parts.
        let parts = json["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or_else(|| AppError::LlmError("Invalid response format from Gemini".to_string()))?;
        let reply: String = parts.iter().filter_map(|part| part["text"].as_str()).collect();

        Ok(reply)
    }
}
