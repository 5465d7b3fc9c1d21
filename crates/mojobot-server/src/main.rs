use std::sync::Arc;

use anyhow::Result;
use mojobot_config::AppConfig;
use mojobot_server::{build_app, ServerState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .compact()
        .init();

    let config = AppConfig::from_env()?;
    let port = config.port;

    info!(
        "Mojobot agent configured: model={}, region={}, knowledge_base={}",
        config.model_id,
        config.region,
        config.knowledge_base_id.as_deref().unwrap_or("disabled")
    );

    let app = build_app(Arc::new(ServerState::from_config(config).await));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Mojobot agent running on port {}", port);
    axum::serve(listener, app).await?;

    Ok(())
}
