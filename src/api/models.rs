use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::news::NewsItem;

#[derive(Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<NewsItem>,
    pub context: String,
    pub search_date: DateTime<Utc>,
}
