//! Newspaper content API. Works keyless through the public `test` key.
//! Tech searches enforce recency here, not at the provider; general
//! searches keep the provider's relevance ranking untouched.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{NewsSourceAdapter, SourceKind, EMPTY_SNIPPET};
use crate::error::Result;
use crate::extract::html_to_text;
use crate::http::{ensure_success, NEWS_CLIENT};
use crate::news::{NewsItem, Query, RecencyWindow, SearchFocus, MAX_ITEMS};
use crate::topic::CONTENT_API_TECH_TERMS;

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: SearchResponse,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    web_title: Option<String>,
    web_url: Option<String>,
    web_publication_date: Option<DateTime<Utc>>,
    fields: Option<ContentFields>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentFields {
    trail_text: Option<String>,
    body_text: Option<String>,
}

pub struct GuardianSource {
    api_key: String,
    base_url: String,
}

impl GuardianSource {
    pub fn new(api_key: String, base_url: String) -> Self {
        GuardianSource { api_key, base_url }
    }

    fn snippet(fields: Option<ContentFields>) -> String {
        let Some(fields) = fields else {
            return EMPTY_SNIPPET.to_string();
        };
        fields
            .trail_text
            .map(|t| html_to_text(&t))
            .filter(|t| !t.is_empty())
            .or_else(|| fields.body_text.map(|b| html_to_text(&b)).filter(|b| !b.is_empty()))
            .unwrap_or_else(|| EMPTY_SNIPPET.to_string())
    }
}

#[async_trait]
impl NewsSourceAdapter for GuardianSource {
    fn name(&self) -> &'static str {
        SourceKind::Guardian.as_str()
    }

    async fn search(&self, query: &Query, window: &RecencyWindow) -> Result<Vec<NewsItem>> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));

        let request = NEWS_CLIENT.get(&url).query(&[
            ("api-key", self.api_key.as_str()),
            ("show-fields", "trailText,bodyText"),
            ("page-size", "10"),
        ]);
        let request = match query.focus {
            SearchFocus::Tech => {
                let q = format!("{} {}", query.truncated(100), CONTENT_API_TECH_TERMS);
                request.query(&[("q", q.as_str()), ("section", "technology"), ("order-by", "newest")])
            }
            SearchFocus::General => {
                request.query(&[("q", query.truncated(200)), ("order-by", "relevance")])
            }
        };

        let response = request.send().await?;
        let body: SearchEnvelope = ensure_success(self.name(), response)?.json().await?;

        let items = body
            .response
            .results
            .into_iter()
            .filter(|content| match query.focus {
                SearchFocus::Tech => content.web_publication_date.is_some_and(|date| window.admits(date)),
                // Relevance-ordered results are taken as they come.
                SearchFocus::General => true,
            })
            .filter_map(|content| {
                let title = content.web_title.filter(|t| !t.trim().is_empty())?;
                Some(NewsItem::new(
                    title,
                    content.web_url.unwrap_or_default(),
                    Self::snippet(content.fields),
                ))
            })
            .take(MAX_ITEMS)
            .collect();

        Ok(items)
    }
}
