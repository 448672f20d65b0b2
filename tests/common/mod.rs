#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use news_chat_compare::error::{AppError, Result};
use news_chat_compare::llm::{LlmProvider, ProviderKind};
use news_chat_compare::news::sources::NewsSourceAdapter;
use news_chat_compare::news::{NewsItem, Query, RecencyWindow};

/// A news source answering from a fixed script and counting its calls.
pub struct StubSource {
    name: &'static str,
    outcome: std::result::Result<Vec<NewsItem>, String>,
    pub calls: Arc<AtomicUsize>,
}

impl StubSource {
    pub fn returning(name: &'static str, items: Vec<NewsItem>) -> Self {
        StubSource {
            name,
            outcome: Ok(items),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(name: &'static str) -> Self {
        StubSource {
            name,
            outcome: Err("connection refused".to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl NewsSourceAdapter for StubSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn search(&self, _query: &Query, _window: &RecencyWindow) -> Result<Vec<NewsItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Ok(items) => Ok(items.clone()),
            Err(msg) => Err(AppError::FetchError(msg.clone())),
        }
    }
}

/// An LLM provider with a canned reply that records the prompts it saw.
pub struct StubProvider {
    kind: ProviderKind,
    configured: bool,
    reply: std::result::Result<String, String>,
    pub calls: Arc<AtomicUsize>,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl StubProvider {
    pub fn replying(kind: ProviderKind, reply: &str) -> Self {
        StubProvider {
            kind,
            configured: true,
            reply: Ok(reply.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(kind: ProviderKind, message: &str) -> Self {
        StubProvider {
            reply: Err(message.to_string()),
            ..Self::replying(kind, "")
        }
    }

    pub fn unconfigured(kind: ProviderKind) -> Self {
        StubProvider {
            configured: false,
            ..Self::replying(kind, "")
        }
    }
}

#[async_trait]
impl LlmProvider for StubProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn configured(&self) -> bool {
        self.configured
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        // Yield so concurrently issued calls interleave.
        tokio::task::yield_now().await;
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(msg) => Err(AppError::LlmError(msg.clone())),
        }
    }
}

pub fn headline(n: usize) -> NewsItem {
    NewsItem::new(
        format!("Headline {}", n),
        format!("https://news.example.com/{}", n),
        format!("Snippet for story {}", n),
    )
}

pub fn count(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}

pub fn as_providers(stubs: &[&Arc<StubProvider>]) -> Vec<Arc<dyn LlmProvider>> {
    stubs
        .iter()
        .map(|stub| Arc::clone(stub) as Arc<dyn LlmProvider>)
        .collect()
}
