//! Web search API (news vertical). Needs a subscription token.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use super::{NewsSourceAdapter, SourceKind, EMPTY_SNIPPET};
use crate::error::Result;
use crate::extract::html_to_text;
use crate::http::{ensure_success, NEWS_CLIENT};
use crate::news::{NewsItem, Query, RecencyWindow, MAX_ITEMS};

#[derive(Debug, Deserialize)]
struct NewsSearchResponse {
    #[serde(default)]
    results: Vec<NewsResult>,
}

#[derive(Debug, Deserialize)]
struct NewsResult {
    title: Option<String>,
    url: Option<String>,
    description: Option<String>,
    page_age: Option<String>,
}

impl NewsResult {
    /// Undated results are kept, as with feeds.
    fn is_within(&self, window: &RecencyWindow) -> bool {
        self.page_age
            .as_deref()
            .and_then(parse_page_age)
            .is_none_or(|published| window.admits(published))
    }
}

/// `page_age` usually comes without an offset and is UTC.
fn parse_page_age(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

pub struct BraveSearchSource {
    api_key: String,
    base_url: String,
}

impl BraveSearchSource {
    pub fn new(api_key: String, base_url: String) -> Self {
        BraveSearchSource { api_key, base_url }
    }
}

/// The provider only filters by coarse buckets: day, week, month, year.
fn freshness(window: &RecencyWindow) -> &'static str {
    match window.days() {
        i64::MIN..=1 => "pd",
        2..=7 => "pw",
        8..=31 => "pm",
        _ => "py",
    }
}

#[async_trait]
impl NewsSourceAdapter for BraveSearchSource {
    fn name(&self) -> &'static str {
        SourceKind::Brave.as_str()
    }

    async fn search(&self, query: &Query, window: &RecencyWindow) -> Result<Vec<NewsItem>> {
        let url = format!("{}/res/v1/news/search", self.base_url.trim_end_matches('/'));
        let count = MAX_ITEMS.to_string();

        let response = NEWS_CLIENT
            .get(&url)
            .header("X-Subscription-Token", &self.api_key)
            .header("Accept", "application/json")
            .query(&[
                ("q", query.truncated(200)),
                ("count", count.as_str()),
                ("freshness", freshness(window)),
            ])
            .send()
            .await?;
        let body: NewsSearchResponse = ensure_success(self.name(), response)?.json().await?;

        let items = body
            .results
            .into_iter()
            // The freshness bucket is coarser than the window.
            .filter(|result| result.is_within(window))
            .filter_map(|result| {
                let title = result.title.map(|t| html_to_text(&t)).filter(|t| !t.is_empty())?;
                let snippet = result
                    .description
                    .map(|d| html_to_text(&d))
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| EMPTY_SNIPPET.to_string());
                Some(NewsItem::new(title, result.url.unwrap_or_default(), snippet))
            })
            .take(MAX_ITEMS)
            .collect();

        Ok(items)
    }
}
