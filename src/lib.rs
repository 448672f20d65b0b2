pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod extract;
pub mod http;
pub mod llm;
pub mod news;
pub mod prompt;
pub mod topic;

use std::sync::Arc;
use chat::ChatService;
use config::Config;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub chat: Arc<ChatService>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let chat = ChatService::from_config(&config);
        AppState {
            config: Arc::new(config),
            chat: Arc::new(chat),
        }
    }
}
