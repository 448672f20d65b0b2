use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::error::{AppError, Result};
use crate::news::sources::SourceKind;
use crate::news::{RecencyPolicy, SearchFocus};
use crate::prompt::TemplateKind;

/// Example keys copied from docs and templates; never real credentials.
const PLACEHOLDER_KEYS: &[&str] = &[
    "2f3d4e5a6b7c8d9e0f1a2b3c4d5e6f7a",
    "c4a1f1e4c4e746f7b3f3c7e8d9a2b5e3",
    "your-api-key",
    "your_api_key_here",
    "changeme",
    "sk-xxxxxxxxxxxxxxxx",
];

const MIN_CREDENTIAL_LEN: usize = 20;

/// Upper bound for any recency span, in days.
pub const MAX_RECENCY_DAYS: i64 = 3650;

/// The public content-search key, usable without signing up.
pub const GUARDIAN_PUBLIC_KEY: &str = "test";

#[derive(Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub providers: ProvidersConfig,
    pub news: NewsConfig,
    pub topic_gate: bool,
    pub template: TemplateKind,
}

#[derive(Clone)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Clone)]
pub struct ProvidersConfig {
    pub openai: ProviderSettings,
    /// Attribution headers for OpenAI-compatible routers.
    pub openai_referer: Option<String>,
    pub openai_title: Option<String>,
    pub gemini: ProviderSettings,
    pub claude: ProviderSettings,
}

#[derive(Clone)]
pub struct NewsConfig {
    pub news_api_key: Option<String>,
    pub news_api_base: String,
    pub guardian_api_key: String,
    pub guardian_api_base: String,
    pub brave_api_key: Option<String>,
    pub brave_api_base: String,
    pub hn_api_base: String,
    pub wikipedia_api_base: String,
    pub wikipedia_page: String,
    pub feed_base: String,
    pub html_search_base: String,
    pub order: Vec<SourceKind>,
    pub recency: RecencyPolicy,
    pub focus: SearchFocus,
}

impl Default for NewsConfig {
    fn default() -> Self {
        NewsConfig {
            news_api_key: None,
            news_api_base: "https://newsapi.org/v2/everything".to_string(),
            guardian_api_key: GUARDIAN_PUBLIC_KEY.to_string(),
            guardian_api_base: "https://content.guardianapis.com".to_string(),
            brave_api_key: None,
            brave_api_base: "https://api.search.brave.com".to_string(),
            hn_api_base: "https://hn.algolia.com/api/v1".to_string(),
            wikipedia_api_base: "https://en.wikipedia.org/api/rest_v1".to_string(),
            wikipedia_page: "Portal:Current_events".to_string(),
            feed_base: "https://news.google.com".to_string(),
            html_search_base: "https://html.duckduckgo.com".to_string(),
            order: SourceKind::DEFAULT_ORDER.to_vec(),
            recency: RecencyPolicy::default(),
            focus: SearchFocus::General,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source, so nothing below
    /// this point reads the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let credential = |key: &str| var(key).filter(|v| !looks_like_placeholder(v));
        let or_default = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let host = or_default("HOST", "127.0.0.1");
        let port = or_default("PORT", "3000");
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;
        let server_addr = SocketAddr::new(ip, port);

        let providers = ProvidersConfig {
            openai: ProviderSettings {
                api_key: credential("OPENAI_API_KEY"),
                model: or_default("OPENAI_MODEL", "gpt-3.5-turbo"),
                base_url: or_default("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            },
            openai_referer: var("OPENAI_REFERER"),
            openai_title: var("OPENAI_TITLE"),
            gemini: ProviderSettings {
                api_key: credential("GEMINI_API_KEY"),
                model: or_default("GEMINI_MODEL", "gemini-2.0-flash"),
                base_url: or_default("GEMINI_BASE_URL", "https://generativelanguage.googleapis.com"),
            },
            claude: ProviderSettings {
                api_key: credential("CLAUDE_API_KEY"),
                model: or_default("CLAUDE_MODEL", "claude-3-haiku-20240307"),
                base_url: or_default("CLAUDE_BASE_URL", "https://api.anthropic.com"),
            },
        };

        let topic_gate = match var("TOPIC_GATE") {
            Some(raw) => parse_bool("TOPIC_GATE", &raw)?,
            None => false,
        };
        let focus = match var("SEARCH_FOCUS") {
            Some(raw) => raw.parse()?,
            None if topic_gate => SearchFocus::Tech,
            None => SearchFocus::General,
        };
        let template = match var("PROMPT_TEMPLATE") {
            Some(raw) => raw.parse()?,
            None if topic_gate => TemplateKind::TechGated,
            None => TemplateKind::Plain,
        };

        let defaults = NewsConfig::default();
        let order = match var("NEWS_SOURCES") {
            Some(raw) => parse_source_order(&raw)?,
            None => defaults.order.clone(),
        };
        let mut recency = RecencyPolicy::default();
        if let Some(raw) = var("NEWS_RECENCY_DAYS") {
            recency.default_days = parse_days("NEWS_RECENCY_DAYS", &raw)?;
        }
        if let Some(raw) = var("NEWS_RECENCY_EXTENDED_DAYS") {
            recency.extended_days = parse_days("NEWS_RECENCY_EXTENDED_DAYS", &raw)?;
        }
        if let Some(raw) = var("NEWS_RECENCY_GENERAL_DAYS") {
            recency.general_days = parse_days("NEWS_RECENCY_GENERAL_DAYS", &raw)?;
        }

        let news = NewsConfig {
            news_api_key: credential("NEWS_API_KEY"),
            news_api_base: var("NEWS_API_BASE").unwrap_or(defaults.news_api_base),
            // The public key is short by nature, so it skips the placeholder check.
            guardian_api_key: var("GUARDIAN_API_KEY").unwrap_or(defaults.guardian_api_key),
            guardian_api_base: var("GUARDIAN_API_BASE").unwrap_or(defaults.guardian_api_base),
            brave_api_key: credential("BRAVE_API_KEY"),
            brave_api_base: var("BRAVE_API_BASE").unwrap_or(defaults.brave_api_base),
            hn_api_base: var("HN_API_BASE").unwrap_or(defaults.hn_api_base),
            wikipedia_api_base: var("WIKIPEDIA_API_BASE").unwrap_or(defaults.wikipedia_api_base),
            wikipedia_page: var("WIKIPEDIA_PAGE").unwrap_or(defaults.wikipedia_page),
            feed_base: var("NEWS_FEED_BASE").unwrap_or(defaults.feed_base),
            html_search_base: var("HTML_SEARCH_BASE").unwrap_or(defaults.html_search_base),
            order,
            recency,
            focus,
        };

        Ok(Config {
            server_addr,
            providers,
            news,
            topic_gate,
            template,
        })
    }
}

/// True for keys that are obviously not real: too short, a known example
/// value, or one character repeated.
pub fn looks_like_placeholder(key: &str) -> bool {
    let key = key.trim();
    if key.len() < MIN_CREDENTIAL_LEN {
        return true;
    }
    let lower = key.to_ascii_lowercase();
    if PLACEHOLDER_KEYS.contains(&lower.as_str()) {
        return true;
    }
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => true,
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::ConfigError(format!("Invalid boolean for {}: {}", key, other))),
    }
}

fn parse_days(key: &str, raw: &str) -> Result<i64> {
    match raw.parse::<i64>() {
        Ok(days) if (1..=MAX_RECENCY_DAYS).contains(&days) => Ok(days),
        _ => Err(AppError::ConfigError(format!("Invalid day count for {}: {}", key, raw))),
    }
}

fn parse_source_order(raw: &str) -> Result<Vec<SourceKind>> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::parse)
        .collect()
}
