//! packmule server entry point.
//!
//! Initialises tracing, loads configuration from environment variables
//! (prefixed with `PACKMULE_`), wires the subprocess installer behind its
//! port, and serves the install endpoint until ctrl-c.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use packmule::config::Config;
use packmule::http::{self, AppState};
use packmule::infra::installer::ProcessInstaller;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialise tracing with RUST_LOG env filter.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load configuration from PACKMULE_* env vars.
    let config = Config::from_env().context("failed to load config from PACKMULE_* env vars")?;
    tracing::info!(
        listen_addr = %config.listen_addr,
        toolchain = ?config.toolchain,
        body_limit = config.body_limit,
        install_timeout_secs = config.install_timeout_secs,
        "configuration loaded",
    );

    // 3. Wire shared state: the production installer behind the port.
    let installer = Arc::new(ProcessInstaller::new(config.install_timeout()));
    let listen_addr = config.listen_addr.clone();
    let state = AppState::new(config, installer);

    // 4. Bind and serve.
    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .context("failed to bind TCP listener")?;
    tracing::info!("install service ready on http://{listen_addr}/install");

    axum::serve(listener, http::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("packmule shut down");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) for graceful shutdown.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl-C handler");
    tracing::info!("received shutdown signal");
}
