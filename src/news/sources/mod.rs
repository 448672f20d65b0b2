//! One adapter per external news provider, all behind [`NewsSourceAdapter`].

pub mod brave;
pub mod feed;
pub mod guardian;
pub mod hackernews;
pub mod html;
pub mod newsapi;
pub mod wikipedia;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::NewsConfig;
use crate::error::{AppError, Result};
use crate::news::{NewsItem, Query, RecencyWindow, MAX_ITEMS};

pub use brave::BraveSearchSource;
pub use feed::FeedSource;
pub use guardian::GuardianSource;
pub use hackernews::HackerNewsSource;
pub use html::HtmlSearchSource;
pub use newsapi::NewsApiSource;
pub use wikipedia::WikipediaSource;

/// Snippet used when a provider returns a headline with no text at all.
pub const EMPTY_SNIPPET: &str = "Read full article for details";

#[async_trait]
pub trait NewsSourceAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Queries the provider. Errors here never reach the resolver.
    async fn search(&self, query: &Query, window: &RecencyWindow) -> Result<Vec<NewsItem>>;

    /// [`search`](Self::search) with every failure collapsed to an empty list.
    async fn fetch(&self, query: &Query, window: &RecencyWindow) -> Vec<NewsItem> {
        match self.search(query, window).await {
            Ok(mut items) => {
                items.truncate(MAX_ITEMS);
                items
            }
            Err(err) => {
                warn!(source = self.name(), error = %err, "news source failed");
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    NewsApi,
    Guardian,
    HackerNews,
    Brave,
    Wikipedia,
    Feed,
    Html,
}

impl SourceKind {
    pub const DEFAULT_ORDER: [SourceKind; 7] = [
        SourceKind::NewsApi,
        SourceKind::Guardian,
        SourceKind::HackerNews,
        SourceKind::Brave,
        SourceKind::Wikipedia,
        SourceKind::Feed,
        SourceKind::Html,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::NewsApi => "newsapi",
            SourceKind::Guardian => "guardian",
            SourceKind::HackerNews => "hackernews",
            SourceKind::Brave => "brave",
            SourceKind::Wikipedia => "wikipedia",
            SourceKind::Feed => "feed",
            SourceKind::Html => "html",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = AppError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newsapi" => Ok(SourceKind::NewsApi),
            "guardian" => Ok(SourceKind::Guardian),
            "hackernews" | "hn" => Ok(SourceKind::HackerNews),
            "brave" => Ok(SourceKind::Brave),
            "wikipedia" => Ok(SourceKind::Wikipedia),
            "feed" | "rss" => Ok(SourceKind::Feed),
            "html" => Ok(SourceKind::Html),
            other => Err(AppError::ConfigError(format!("Unknown news source: {}", other))),
        }
    }
}

/// Builds the cascade in configured order. Sources whose credential is
/// missing are left out rather than tried and failed.
pub fn build_sources(config: &NewsConfig) -> Vec<Box<dyn NewsSourceAdapter>> {
    let mut sources: Vec<Box<dyn NewsSourceAdapter>> = Vec::with_capacity(config.order.len());

    for kind in &config.order {
        match kind {
            SourceKind::NewsApi => match &config.news_api_key {
                Some(key) => sources.push(Box::new(NewsApiSource::new(key.clone(), config.news_api_base.clone()))),
                None => info!(source = %kind, "no credential configured, skipping"),
            },
            SourceKind::Guardian => sources.push(Box::new(GuardianSource::new(
                config.guardian_api_key.clone(),
                config.guardian_api_base.clone(),
            ))),
            SourceKind::HackerNews => sources.push(Box::new(HackerNewsSource::new(config.hn_api_base.clone()))),
            SourceKind::Brave => match &config.brave_api_key {
                Some(key) => sources.push(Box::new(BraveSearchSource::new(key.clone(), config.brave_api_base.clone()))),
                None => info!(source = %kind, "no credential configured, skipping"),
            },
            SourceKind::Wikipedia => sources.push(Box::new(WikipediaSource::new(
                config.wikipedia_api_base.clone(),
                config.wikipedia_page.clone(),
            ))),
            SourceKind::Feed => sources.push(Box::new(FeedSource::new(config.feed_base.clone()))),
            SourceKind::Html => sources.push(Box::new(HtmlSearchSource::new(config.html_search_base.clone()))),
        }
    }

    sources
}
