use axum::{
    routing::post,
    Router,
    extract::{rejection::JsonRejection, Json, Path, State},
    response::IntoResponse,
};
use tower_http::cors::{CorsLayer, Any};
use chrono::Utc;
use tracing::info;

use crate::error::{Result, AppError};
use crate::api::models::{ChatRequest, SearchRequest, SearchResponse};
use crate::api::response;
use crate::llm::ProviderKind;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/chat/:provider", post(chat_handler))
        .route("/compare", post(compare_handler))
        .route("/search", post(search_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

/// Axum's own rejection bodies are plain text; keep every error as `{ error }`.
fn parse_body<T>(body: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    body.map(|Json(inner)| inner)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

async fn chat_handler(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    body: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let kind: ProviderKind = provider.parse()?;
    let req = parse_body(body)?;
    info!(provider = %kind, "chat request");

    let reply = state.chat.answer(kind, &req.message).await?;
    Ok(response::success(reply))
}

async fn compare_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let req = parse_body(body)?;
    info!("compare request");

    let comparison = state.chat.compare(&req.message).await?;
    Ok(response::success(comparison))
}

async fn search_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<SearchRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let req = parse_body(body)?;
    if req.query.trim().is_empty() {
        return Err(AppError::BadRequest("Query is required".to_string()));
    }
    info!("search request");

    let context = state.chat.resolver().resolve(&req.query).await;
    Ok(response::success(SearchResponse {
        results: context.items().to_vec(),
        context: context.formatted_text().to_string(),
        search_date: Utc::now(),
    }))
}
