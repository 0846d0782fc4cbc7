//! Cache Gate - rate-limited read-through cache for a read-mostly data API
//!
//! Serves patient readmission data through a two-tier cache behind a
//! per-client rate limiter.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cache_gate::api::{create_router, AppState};
use cache_gate::config::Config;
use cache_gate::data::RecordSet;
use cache_gate::tasks::spawn_sweep_task;

/// Main entry point for the Cache Gate server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Load the record set
/// 4. Create cache tiers and rate limiter
/// 5. Start background window sweep task
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cache_gate=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cache Gate server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: recency_capacity={}, frequency_capacity={}, rate_limit={} requests per {}ms, port={}",
        config.recency_capacity,
        config.frequency_capacity,
        config.rate_limit_max_requests,
        config.rate_limit_window_ms,
        config.server_port
    );

    let records = match &config.dataset_path {
        Some(path) => RecordSet::load(path)?,
        None => {
            warn!("DATASET_PATH not set, serving an empty record set");
            RecordSet::default()
        }
    };
    info!("Record set loaded: {} patients", records.len());

    let state = AppState::from_config(&config, records);

    let sweep_handle = spawn_sweep_task(
        state.limiter.clone(),
        Duration::from_millis(config.sweep_interval_ms),
    );
    info!("Background window sweep started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    // Peer addresses feed the rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(sweep_handle))
    .await
    .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(sweep_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    sweep_handle.abort();
    warn!("Window sweep task aborted");
}
