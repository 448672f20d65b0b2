//! Tech community search (Hacker News via the Algolia search API).

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;

use super::{NewsSourceAdapter, SourceKind};
use crate::error::Result;
use crate::extract::html_to_text;
use crate::http::{ensure_success, NEWS_CLIENT};
use crate::news::{NewsItem, Query, RecencyWindow, MAX_ITEMS};
use crate::topic::search_keywords;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    title: Option<String>,
    url: Option<String>,
    story_text: Option<String>,
    created_at_i: Option<i64>,
    #[serde(rename = "objectID", default)]
    object_id: String,
    points: Option<i64>,
    num_comments: Option<i64>,
}

pub struct HackerNewsSource {
    base_url: String,
}

impl HackerNewsSource {
    pub fn new(base_url: String) -> Self {
        HackerNewsSource { base_url }
    }
}

impl Hit {
    fn into_item(self) -> Option<NewsItem> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        let url = self
            .url
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| format!("https://news.ycombinator.com/item?id={}", self.object_id));
        let snippet = self
            .story_text
            .map(|text| html_to_text(&text))
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| {
                format!(
                    "{} points and {} comments on Hacker News",
                    self.points.unwrap_or(0),
                    self.num_comments.unwrap_or(0)
                )
            });
        Some(NewsItem::new(title, url, snippet))
    }
}

#[async_trait]
impl NewsSourceAdapter for HackerNewsSource {
    fn name(&self) -> &'static str {
        SourceKind::HackerNews.as_str()
    }

    async fn search(&self, query: &Query, window: &RecencyWindow) -> Result<Vec<NewsItem>> {
        let keywords = search_keywords(&query.raw_text);
        let terms = if keywords.is_empty() {
            query.truncated(200).to_string()
        } else {
            keywords
        };
        let url = format!("{}/search_by_date", self.base_url.trim_end_matches('/'));
        let numeric_filter = format!("created_at_i>{}", window.from.timestamp());
        let hits_per_page = MAX_ITEMS.to_string();

        let response = NEWS_CLIENT
            .get(&url)
            .query(&[
                ("query", terms.as_str()),
                ("tags", "story"),
                ("numericFilters", numeric_filter.as_str()),
                ("hitsPerPage", hits_per_page.as_str()),
            ])
            .send()
            .await?;
        let body: SearchResponse = ensure_success(self.name(), response)?.json().await?;

        let items = body
            .hits
            .into_iter()
            .filter(|hit| {
                hit.created_at_i
                    .and_then(|ts| DateTime::from_timestamp(ts, 0))
                    .is_some_and(|created| window.admits(created))
            })
            .filter_map(Hit::into_item)
            .take(MAX_ITEMS)
            .collect();

        Ok(items)
    }
}
