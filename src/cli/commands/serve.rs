use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::app::{app, AppState};
use crate::config;
use crate::session::spawn_cleanup;

pub async fn handle(port: Option<u16>) -> anyhow::Result<()> {
    let mut config = config::config().clone();
    if let Some(port) = port {
        config.server.port = port;
    }

    info!("Starting Recipes API in {:?} mode", config.environment);
    if crate::is_production!() && config.security.insecure_password_hashing {
        warn!("Insecure password hashing is enabled in production");
    }

    let bind_addr = config.bind_addr();
    let state = AppState::from_config(config).await?;
    let cleanup = spawn_cleanup(state.sessions.clone(), &state.config.session);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Recipes API listening on http://{}", bind_addr);

    axum::serve(listener, app(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    cleanup.abort();
    state.database.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
