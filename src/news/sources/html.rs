//! Last resort: the HTML-only results page of a search engine. The page
//! carries no dates, so no recency filtering is possible here.

use async_trait::async_trait;

use super::{NewsSourceAdapter, SourceKind};
use crate::error::Result;
use crate::extract::extract_html_results;
use crate::http::{ensure_success, NEWS_CLIENT};
use crate::news::{NewsItem, Query, RecencyWindow, MAX_ITEMS};

pub struct HtmlSearchSource {
    base_url: String,
}

impl HtmlSearchSource {
    pub fn new(base_url: String) -> Self {
        HtmlSearchSource { base_url }
    }
}

#[async_trait]
impl NewsSourceAdapter for HtmlSearchSource {
    fn name(&self) -> &'static str {
        SourceKind::Html.as_str()
    }

    async fn search(&self, query: &Query, _window: &RecencyWindow) -> Result<Vec<NewsItem>> {
        let url = format!("{}/html/", self.base_url.trim_end_matches('/'));
        let q = format!("{} news", query.truncated(200));

        let response = NEWS_CLIENT
            .get(&url)
            .header("Accept", "text/html,application/xhtml+xml")
            .query(&[("q", q.as_str())])
            .send()
            .await?;
        let html = ensure_success(self.name(), response)?.text().await?;

        let mut items = extract_html_results(&html);
        items.truncate(MAX_ITEMS);
        Ok(items)
    }
}
