use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_chat::config::Config;
use resume_chat::page::{OllamaAgentFactory, PageController};
use resume_chat::routes::build_router;
use resume_chat::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("resume_chat={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Chat API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Model backend: {} (model: {}, embeddings: {})",
        config.ollama_host, config.llm_model, config.embed_model
    );

    let factory = Arc::new(OllamaAgentFactory::new(config.clone()));
    let page = PageController::new(config.upload_path.clone(), factory);
    let state = AppState::new(config.clone(), page);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
