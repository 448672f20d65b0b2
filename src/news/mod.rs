//! Request-scoped news types shared by the sources, the resolver and the
//! prompt templates.

pub mod resolver;
pub mod sources;

use std::str::FromStr;

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Most items a context will ever carry.
pub const MAX_ITEMS: usize = 5;

/// Snippets are clamped to this many characters.
pub const SNIPPET_LIMIT: usize = 250;

pub const DATE_LINE_PREFIX: &str = "Today's Date: ";

/// One normalized headline. Constructed only through [`NewsItem::new`],
/// which enforces the snippet limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsItem {
    title: String,
    url: String,
    snippet: String,
}

impl NewsItem {
    pub fn new(title: impl Into<String>, url: impl Into<String>, snippet: impl AsRef<str>) -> Self {
        NewsItem {
            title: title.into(),
            url: url.into(),
            snippet: clamp_chars(snippet.as_ref(), SNIPPET_LIMIT),
        }
    }

    /// The item used when no source produced anything.
    pub fn date_only(today: &str) -> Self {
        NewsItem::new(
            format!("Current Date: {}", today),
            "",
            format!(
                "Today is {}. While specific news articles couldn't be fetched, this confirms the current date for time-sensitive questions.",
                today
            ),
        )
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn snippet(&self) -> &str {
        &self.snippet
    }
}

/// Returns at most `limit` characters of `text`, never splitting a char.
pub fn clamp_chars(text: &str, limit: usize) -> String {
    truncate_chars(text, limit).to_string()
}

pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// How sources build their query: topic-restricted deployments augment the
/// question with tech terms, general ones pass it through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchFocus {
    Tech,
    General,
}

impl FromStr for SearchFocus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tech" => Ok(SearchFocus::Tech),
            "general" => Ok(SearchFocus::General),
            other => Err(AppError::ConfigError(format!("Invalid search focus: {}", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Query {
    pub raw_text: String,
    pub issued_at: DateTime<Utc>,
    pub focus: SearchFocus,
}

impl Query {
    pub fn new(raw_text: impl Into<String>, focus: SearchFocus) -> Self {
        Query {
            raw_text: raw_text.into(),
            issued_at: Utc::now(),
            focus,
        }
    }

    /// The question cut down to what a given source accepts.
    pub fn truncated(&self, max_chars: usize) -> &str {
        truncate_chars(self.raw_text.trim(), max_chars)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl RecencyWindow {
    /// Spans past the representable range clamp to its start.
    pub fn ending_at(to: DateTime<Utc>, days: i64) -> Self {
        let from = Duration::try_days(days)
            .and_then(|span| to.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        RecencyWindow { from, to }
    }

    pub fn from_date(&self) -> NaiveDate {
        self.from.date_naive()
    }

    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days()
    }

    /// Items published before `from` are stale. Future timestamps are kept,
    /// providers' clocks drift.
    pub fn admits(&self, published: DateTime<Utc>) -> bool {
        published >= self.from
    }

    pub fn describe(&self) -> String {
        let days = self.days();
        if days <= 3 {
            format!("{} hours", days * 24)
        } else {
            format!("{} days", days)
        }
    }
}

/// Derives a window from the search focus and keyword heuristics on the
/// question text. General searches look back much further than tech ones.
#[derive(Debug, Clone)]
pub struct RecencyPolicy {
    pub default_days: i64,
    pub extended_days: i64,
    pub general_days: i64,
    pub widen_keywords: Vec<String>,
}

impl Default for RecencyPolicy {
    fn default() -> Self {
        RecencyPolicy {
            default_days: 2,
            extended_days: 7,
            general_days: 365,
            widen_keywords: ["weekend", "this week", "past week", "last week", "last few days"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

impl RecencyPolicy {
    pub fn window_for(&self, query: &Query) -> RecencyWindow {
        if query.focus == SearchFocus::General {
            return RecencyWindow::ending_at(query.issued_at, self.general_days);
        }
        let lower = query.raw_text.to_lowercase();
        let days = if self.widen_keywords.iter().any(|k| lower.contains(k.as_str())) {
            self.extended_days
        } else {
            self.default_days
        };
        RecencyWindow::ending_at(query.issued_at, days)
    }
}

/// The resolver's output: up to [`MAX_ITEMS`] items plus the text block
/// injected into prompts. `formatted_text` always starts with the date line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedContext {
    items: Vec<NewsItem>,
    formatted_text: String,
}

impl NormalizedContext {
    pub fn new(mut items: Vec<NewsItem>, window: &RecencyWindow, today: &str) -> Self {
        items.truncate(MAX_ITEMS);
        let formatted_text = format_items(&items, window, today);
        NormalizedContext { items, formatted_text }
    }

    pub fn items(&self) -> &[NewsItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<NewsItem> {
        self.items
    }

    pub fn formatted_text(&self) -> &str {
        &self.formatted_text
    }
}

fn format_items(items: &[NewsItem], window: &RecencyWindow, today: &str) -> String {
    let mut text = format!("{}{}\n\n", DATE_LINE_PREFIX, today);

    if items.is_empty() {
        text.push_str("No recent news articles were fetched, but the current date has been provided above.");
        return text;
    }

    if items.iter().any(|item| !item.url.is_empty()) {
        text.push_str(&format!("Recent news (from the last {}):\n\n", window.describe()));
    }

    let blocks: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            if item.url.is_empty() {
                format!("{}\n{}", item.title, item.snippet)
            } else {
                format!("({}) {}\nURL: {}\nSnippet: {}", index + 1, item.title, item.url, item.snippet)
            }
        })
        .collect();
    text.push_str(&blocks.join("\n\n"));
    text
}

/// Long-form US date, e.g. "Sunday, October 18, 2026".
pub fn format_date(date: DateTime<Local>) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

pub fn today() -> String {
    format_date(Local::now())
}
