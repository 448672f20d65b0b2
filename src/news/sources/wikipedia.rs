//! Encyclopedia summary of a fixed current-events page. The question does
//! not change the request; the page is only useful while it is fresh.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{NewsSourceAdapter, SourceKind};
use crate::error::Result;
use crate::extract::collapse_whitespace;
use crate::http::{ensure_success, NEWS_CLIENT};
use crate::news::{NewsItem, Query, RecencyWindow};

#[derive(Debug, Deserialize)]
struct PageSummary {
    title: Option<String>,
    extract: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: Option<PageUrls>,
}

#[derive(Debug, Deserialize)]
struct PageUrls {
    page: Option<String>,
}

pub struct WikipediaSource {
    base_url: String,
    page: String,
}

impl WikipediaSource {
    pub fn new(base_url: String, page: String) -> Self {
        WikipediaSource { base_url, page }
    }
}

#[async_trait]
impl NewsSourceAdapter for WikipediaSource {
    fn name(&self) -> &'static str {
        SourceKind::Wikipedia.as_str()
    }

    async fn search(&self, _query: &Query, window: &RecencyWindow) -> Result<Vec<NewsItem>> {
        let url = format!(
            "{}/page/summary/{}",
            self.base_url.trim_end_matches('/'),
            self.page.replace(' ', "_")
        );

        let response = NEWS_CLIENT.get(&url).send().await?;
        let summary: PageSummary = ensure_success(self.name(), response)?.json().await?;

        let extract = summary.extract.map(|e| collapse_whitespace(&e)).unwrap_or_default();
        if extract.is_empty() {
            return Ok(Vec::new());
        }
        if summary.timestamp.is_some_and(|edited| !window.admits(edited)) {
            return Ok(Vec::new());
        }

        let title = summary.title.unwrap_or_else(|| self.page.replace('_', " "));
        let url = summary
            .content_urls
            .and_then(|urls| urls.desktop)
            .and_then(|desktop| desktop.page)
            .unwrap_or_default();

        Ok(vec![NewsItem::new(format!("Wikipedia: {}", title), url, extract)])
    }
}
