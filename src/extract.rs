//! Best-effort text extraction from feed and search-page bodies.
//!
//! Feeds are pulled apart with regular expressions rather than a strict XML
//! parser: the feeds in question routinely embed escaped HTML and CDATA, and
//! a partially broken document should still yield whatever items it has.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::news::NewsItem;

static ITEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<item\b[^>]*>(.*?)</item>").expect("Failed to compile item regex")
});
static TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<title\b[^>]*>(.*?)</title>").expect("Failed to compile title regex")
});
static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<link\b[^>]*>(.*?)</link>").expect("Failed to compile link regex")
});
static DESCRIPTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<description\b[^>]*>(.*?)</description>").expect("Failed to compile description regex")
});
static PUB_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<pubDate\b[^>]*>(.*?)</pubDate>").expect("Failed to compile pubDate regex")
});
static CDATA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").expect("Failed to compile CDATA regex")
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)</?[a-zA-Z!][^<>]*>").expect("Failed to compile tag regex")
});
static NUMERIC_ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("Failed to compile entity regex")
});

static RESULT_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".result:not(.result--ad)").expect("Failed to parse result selector")
});
static RESULT_LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a.result__a").expect("Failed to parse result link selector")
});
static RESULT_SNIPPET_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".result__snippet").expect("Failed to parse result snippet selector")
});

/// A feed item together with its parsed publish time, if it had one.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub item: NewsItem,
    pub published: Option<DateTime<Utc>>,
}

/// Pulls `<item>` entries out of an RSS body. Items without a title and the
/// feed's own "Google News" boilerplate entries are skipped.
pub fn extract_feed_items(xml: &str) -> Vec<FeedEntry> {
    ITEM_RE
        .captures_iter(xml)
        .filter_map(|caps| {
            let body = caps.get(1)?.as_str();

            let title = field(&TITLE_RE, body).map(|t| html_to_text(&t)).unwrap_or_default();
            if title.is_empty() || title.contains("Google News") {
                return None;
            }

            let url = field(&LINK_RE, body).map(|l| l.trim().to_string()).unwrap_or_default();
            let snippet = field(&DESCRIPTION_RE, body).map(|d| html_to_text(&d)).unwrap_or_default();
            let published = field(&PUB_DATE_RE, body).and_then(|d| parse_rfc2822(&d));

            Some(FeedEntry {
                item: NewsItem::new(title, url, snippet),
                published,
            })
        })
        .collect()
}

fn field(re: &Regex, body: &str) -> Option<String> {
    re.captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| strip_cdata(m.as_str()))
}

fn parse_rfc2822(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw.trim())
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Reads organic results out of a search-engine HTML results page.
pub fn extract_html_results(html: &str) -> Vec<NewsItem> {
    let document = Html::parse_document(html);

    document
        .select(&RESULT_SELECTOR)
        .filter_map(|result| {
            let link = result.select(&RESULT_LINK_SELECTOR).next()?;
            let title = element_text(link);
            if title.is_empty() {
                return None;
            }

            let url = link.value().attr("href").map(resolve_result_href).unwrap_or_default();
            let snippet = result
                .select(&RESULT_SNIPPET_SELECTOR)
                .next()
                .map(element_text)
                .unwrap_or_default();

            Some(NewsItem::new(title, url, snippet))
        })
        .collect()
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Result links are redirect URLs carrying the target in `uddg`.
fn resolve_result_href(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    match Url::parse(&absolute) {
        Ok(parsed) => parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, target)| target.into_owned())
            .unwrap_or(absolute),
        Err(_) => absolute,
    }
}

pub fn strip_cdata(text: &str) -> String {
    CDATA_RE.replace_all(text, "$1").into_owned()
}

/// Decodes the handful of named entities feeds actually use, plus numeric ones.
pub fn decode_entities(text: &str) -> String {
    let numeric = NUMERIC_ENTITY_RE.replace_all(text, |caps: &regex::Captures<'_>| {
        let raw = &caps[1];
        let code = match raw.strip_prefix('x').or_else(|| raw.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => raw.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    numeric
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

pub fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, " ").into_owned()
}

/// Plain text from a fragment that may be escaped HTML, real HTML, or both.
/// Bare `<` and `>` in text survive; only tag-shaped runs are removed.
pub fn html_to_text(fragment: &str) -> String {
    let once = decode_entities(&strip_tags(fragment));
    // Escaped markup only becomes visible after the first decode.
    if TAG_RE.is_match(&once) {
        collapse_whitespace(&decode_entities(&strip_tags(&once)))
    } else {
        collapse_whitespace(&once)
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(word);
    }
    result
}
