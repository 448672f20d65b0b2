use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};

use crate::api::response;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Failed to fetch data: {0}")]
    FetchError(String),

    #[error("Error parsing content: {0}")]
    ParseError(String),

    #[error("LLM processing error: {0}")]
    LlmError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownProvider(_) => StatusCode::NOT_FOUND,
            AppError::FetchError(_) | AppError::ParseError(_) => StatusCode::BAD_GATEWAY,
            AppError::LlmError(_) | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The caller-facing message, without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            AppError::BadRequest(msg)
            | AppError::FetchError(msg)
            | AppError::ParseError(msg)
            | AppError::LlmError(msg)
            | AppError::ConfigError(msg) => msg,
            AppError::UnknownProvider(name) => name,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::UnknownProvider(name) => format!("Unknown provider: {}", name),
            other => other.message().to_string(),
        };

        response::error(self.status(), message).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::ParseError(err.to_string())
        } else {
            AppError::FetchError(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_variants_to_status_codes() {
        assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::UnknownProvider("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::ConfigError("Claude API key not configured".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn message_drops_the_variant_prefix() {
        let err = AppError::ConfigError("Gemini API key not configured".into());
        assert_eq!(err.message(), "Gemini API key not configured");
        assert_eq!(err.to_string(), "Configuration error: Gemini API key not configured");
    }
}
