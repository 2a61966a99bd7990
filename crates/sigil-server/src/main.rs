mod error;
mod routes;
mod state;

use anyhow::Context;
use sigil_core::SigilConfig;
use state::AppState;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = SigilConfig::load(None).context("failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.logging.filter))
        .context("invalid logging.filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let state = AppState::init(&cfg)
        .await
        .context("failed to initialise engine")?;
    let app = routes::router(Arc::new(state));

    let addr = cfg.server.bind.as_str();
    tracing::info!(backend = ?cfg.storage.backend, "sigil-server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
