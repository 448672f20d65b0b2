//! Authenticated primary news API (`/v2/everything`).

use async_trait::async_trait;
use serde::Deserialize;

use super::{NewsSourceAdapter, SourceKind, EMPTY_SNIPPET};
use crate::error::Result;
use crate::extract::html_to_text;
use crate::http::{ensure_success, NEWS_CLIENT};
use crate::news::{NewsItem, Query, RecencyWindow, SearchFocus, MAX_ITEMS};
use crate::topic::NEWS_API_TECH_TERMS;

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
    url: Option<String>,
    description: Option<String>,
    content: Option<String>,
}

pub struct NewsApiSource {
    api_key: String,
    endpoint: String,
}

impl NewsApiSource {
    pub fn new(api_key: String, endpoint: String) -> Self {
        NewsApiSource { api_key, endpoint }
    }

    fn query_text(query: &Query) -> (String, &'static str) {
        match query.focus {
            SearchFocus::Tech => (format!("{} {}", query.truncated(100), NEWS_API_TECH_TERMS), "publishedAt"),
            SearchFocus::General => (query.truncated(200).to_string(), "relevancy"),
        }
    }
}

#[async_trait]
impl NewsSourceAdapter for NewsApiSource {
    fn name(&self) -> &'static str {
        SourceKind::NewsApi.as_str()
    }

    async fn search(&self, query: &Query, window: &RecencyWindow) -> Result<Vec<NewsItem>> {
        let (q, sort_by) = Self::query_text(query);
        let from = window.from_date().format("%Y-%m-%d").to_string();
        let page_size = MAX_ITEMS.to_string();

        let response = NEWS_CLIENT
            .get(&self.endpoint)
            .header("X-Api-Key", &self.api_key)
            .query(&[
                ("q", q.as_str()),
                ("from", from.as_str()),
                ("sortBy", sort_by),
                ("language", "en"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await?;
        let body: EverythingResponse = ensure_success(self.name(), response)?.json().await?;

        let items = body
            .articles
            .into_iter()
            .filter_map(|article| {
                let title = article.title.filter(|t| !t.trim().is_empty() && t != "[Removed]")?;
                let snippet = article
                    .description
                    .filter(|d| !d.trim().is_empty())
                    .or(article.content)
                    .map(|text| html_to_text(&text))
                    .filter(|text| !text.is_empty())
                    .unwrap_or_else(|| EMPTY_SNIPPET.to_string());
                Some(NewsItem::new(title, article.url.unwrap_or_default(), snippet))
            })
            .take(MAX_ITEMS)
            .collect();

        Ok(items)
    }
}
