use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder, Response};

use crate::error::{AppError, Result};

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// News sources are tried one after another, so each gets a short budget.
pub static NEWS_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .timeout(Duration::from_secs(10))
        .connect_timeout(Duration::from_secs(5))
        .pool_max_idle_per_host(10)
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to build news HTTP client")
});

// Completions are left to run to completion; only connecting is bounded.
pub static LLM_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build LLM HTTP client")
});

/// Turns a non-2xx status into a `FetchError` naming the source.
pub fn ensure_success(source: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(AppError::FetchError(format!("{} returned HTTP {}", source, status)))
    }
}
