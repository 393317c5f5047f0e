// src/main.rs

use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use readygo::config::CONFIG;
use readygo::llm::LlmService;
use readygo::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let level = CONFIG.log_level.parse().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Ready-To-Go answer backend");
    info!("Default model: {}", CONFIG.default_model);
    info!("GPU server: {}", CONFIG.gpu_server_url);
    info!(
        "Outbound translation: {}",
        if CONFIG.translate_strict { "strict chain" } else { "lenient" }
    );

    let service = Arc::new(LlmService::from_config(&CONFIG)?);
    let app = server::app(service);

    let bind_address = format!("{}:{}", CONFIG.host, CONFIG.port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on {}", bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}
