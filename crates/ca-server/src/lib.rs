//! ca-server: HTTP API for format discovery, conversion and uploads.
//!
//! This crate ties the other ca-* crates into a running server:
//!
//! - Axum HTTP API with bearer-token auth, request ids and rate limiting
//! - Optional pass-through proxy to a remote conversion backend
//! - Background TTL sweeper over the public object store
//! - Graceful shutdown via signal handling

pub mod context;
pub mod error;
pub mod middleware;
pub mod proxy;
pub mod router;
pub mod routes;

use std::net::SocketAddr;
use std::time::Duration;

use ca_core::config::Config;
use ca_storage::start_sweeper_task;
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;

const SECS_PER_HOUR: u64 = 60 * 60;

/// Start the server.
///
/// Builds the [`AppContext`], spawns the sweeper when cleanup is enabled and
/// serves HTTP until a shutdown signal arrives.
pub async fn start(config: Config) -> ca_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let ctx = AppContext::from_config(config.clone()).await?;
    tracing::info!(
        categories = ctx.registry.catalog().len(),
        formats = ctx.registry.catalog().format_count(),
        "Format catalog loaded"
    );
    if let Some(proxy) = ctx.proxy.as_ref() {
        tracing::info!(backend = %proxy.base_url(), "Proxy backend configured");
    }

    let cancel = CancellationToken::new();

    let sweeper_handle = if config.cleanup.enabled {
        let period = Duration::from_secs(config.cleanup.interval_hours.max(1) * SECS_PER_HOUR);
        tracing::info!(
            retention_hours = config.cleanup.retention_hours,
            interval_hours = period.as_secs() / SECS_PER_HOUR,
            "Cleanup sweeper enabled"
        );
        Some(start_sweeper_task(ctx.sweeper(), period, cancel.clone()))
    } else {
        None
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| ca_core::Error::Internal(format!("Invalid server address: {e}")))?;

    let app = router::build_router(ctx);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ca_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;
    let local = listener.local_addr()?;
    tracing::info!("Listening on {local}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await?;

    cancel.cancel();
    if let Some(handle) = sweeper_handle {
        if let Err(e) = handle.await {
            tracing::error!("Sweeper task failed: {e}");
        }
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM) or cancellation.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
        _ = cancel.cancelled() => {}
    }

    tracing::info!("Shutdown signal received");
}
