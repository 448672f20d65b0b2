//! Raw RSS search feed, scraped with [`crate::extract::extract_feed_items`].

use async_trait::async_trait;

use super::{NewsSourceAdapter, SourceKind};
use crate::error::Result;
use crate::extract::extract_feed_items;
use crate::http::{ensure_success, NEWS_CLIENT};
use crate::news::{NewsItem, Query, RecencyWindow, MAX_ITEMS};

pub struct FeedSource {
    base_url: String,
}

impl FeedSource {
    pub fn new(base_url: String) -> Self {
        FeedSource { base_url }
    }
}

#[async_trait]
impl NewsSourceAdapter for FeedSource {
    fn name(&self) -> &'static str {
        SourceKind::Feed.as_str()
    }

    async fn search(&self, query: &Query, window: &RecencyWindow) -> Result<Vec<NewsItem>> {
        let url = format!("{}/rss/search", self.base_url.trim_end_matches('/'));
        // `when:` narrows the feed itself; dates are still checked below.
        let q = format!("{} when:{}d", query.truncated(200), window.days().max(1));

        let response = NEWS_CLIENT
            .get(&url)
            .query(&[("q", q.as_str()), ("hl", "en-US"), ("gl", "US"), ("ceid", "US:en")])
            .send()
            .await?;
        let body = ensure_success(self.name(), response)?.text().await?;

        // Undated entries are kept: there is nothing to hold against them.
        let items = extract_feed_items(&body)
            .into_iter()
            .filter(|entry| entry.published.is_none_or(|published| window.admits(published)))
            .map(|entry| entry.item)
            .take(MAX_ITEMS)
            .collect();

        Ok(items)
    }
}
