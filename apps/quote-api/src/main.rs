//! # Solar Quote API Server
//!
//! ```bash
//! # Defaults: 0.0.0.0:3000, ./data/catalog.json (seeded on first start)
//! cargo run -p solar-quote-api
//!
//! # Explicit config file
//! cargo run -p solar-quote-api -- --config ./solar-quote.toml
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use solar_catalog::{CatalogStore, StoreConfig};
use solar_quote_api::{router, AppState, ServerConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset or unparsable.
const DEFAULT_LOG_FILTER: &str = "solar_quote_api=info,solar_catalog=info";

/// How often idle quote sessions are swept.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Starting Solar Quote API server...");

    let config = ServerConfig::load(config_path_from_args()).context("loading server config")?;
    info!(
        bind = %config.http.bind_address(),
        catalog = %config.catalog.path.display(),
        "Configuration loaded"
    );

    let store = CatalogStore::open(
        StoreConfig::new(&config.catalog.path)
            .upload_dir(&config.catalog.upload_dir)
            .seed_if_missing(config.catalog.seed_if_missing),
    )
    .await
    .context("opening equipment catalog")?;

    let state = AppState::new(store, config.sessions.clone(), config.company.clone());
    spawn_session_sweeper(state.clone());

    let listener = tokio::net::TcpListener::bind(config.http.bind_address())
        .await
        .with_context(|| format!("binding {}", config.http.bind_address()))?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// `--config <path>` / `-c <path>`, if given.
fn config_path_from_args() -> Option<PathBuf> {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|a| a == "--config" || a == "-c")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
}

fn spawn_session_sweeper(state: AppState) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = state.sessions.purge_expired();
            if purged > 0 {
                info!(purged, remaining = state.sessions.len(), "Expired quote sessions purged");
            }
        }
    });
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
