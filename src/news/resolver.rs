use std::time::Instant;

use tracing::{debug, info};

use super::sources::{build_sources, NewsSourceAdapter};
use super::{today, NewsItem, NormalizedContext, Query, RecencyPolicy, SearchFocus};
use crate::config::NewsConfig;

/// Walks the configured sources in order and keeps the first non-empty
/// answer. Never fails: with nothing found the context carries only a
/// date item.
pub struct NewsContextResolver {
    sources: Vec<Box<dyn NewsSourceAdapter>>,
    policy: RecencyPolicy,
    focus: SearchFocus,
}

impl NewsContextResolver {
    pub fn new(sources: Vec<Box<dyn NewsSourceAdapter>>, policy: RecencyPolicy, focus: SearchFocus) -> Self {
        NewsContextResolver { sources, policy, focus }
    }

    pub fn from_config(config: &NewsConfig) -> Self {
        Self::new(build_sources(config), config.recency.clone(), config.focus)
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub async fn resolve(&self, question: &str) -> NormalizedContext {
        let query = Query::new(question, self.focus);
        let window = self.policy.window_for(&query);
        let today = today();

        // One source at a time; the next is tried only after this one came back empty.
        for source in &self.sources {
            let started = Instant::now();
            let items = source.fetch(&query, &window).await;
            debug!(source = source.name(), count = items.len(), elapsed = ?started.elapsed(), "news source answered");

            if !items.is_empty() {
                info!(source = source.name(), count = items.len(), "news context resolved");
                return NormalizedContext::new(items, &window, &today);
            }
        }

        info!("no news source produced items, falling back to date context");
        NormalizedContext::new(vec![NewsItem::date_only(&today)], &window, &today)
    }
}
