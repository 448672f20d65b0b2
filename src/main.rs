use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use news_chat_compare::{
    config::Config,
    api::routes::create_router,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(true).init();

    // Load configuration
    let config = Config::load()?;
    let server_addr = config.server_addr;

    let app_state = AppState::new(config);
    info!(
        sources = ?app_state.chat.resolver().source_names(),
        template = %app_state.config.template,
        topic_gate = app_state.config.topic_gate,
        "configuration loaded"
    );

    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;

    info!("Listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
