//! HTTP server lifecycle
//!
//! Binds the configured address and serves the API router until the
//! shutdown channel flips to `true`.

use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::api::router::api_router;
use crate::api::types::AppContext;
use crate::config::ServerConfig;
use crate::core::records::Records;
use crate::domain::{MedigramError, Result};

/// Serves the API until shutdown is signalled
///
/// # Errors
///
/// Returns `MedigramError::Io` if the address cannot be bound or the server
/// fails while running.
pub async fn serve(
    server: &ServerConfig,
    records: Records,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let listener = TcpListener::bind(&server.bind_address)
        .await
        .map_err(|e| MedigramError::Io(format!("Failed to bind {}: {e}", server.bind_address)))?;

    let addr = listener.local_addr()?;
    let app = api_router(AppContext::new(records), server);

    tracing::info!(%addr, "Medigram API listening");

    let shutdown_signal = async move {
        while !*shutdown.borrow() {
            if shutdown.changed().await.is_err() {
                break;
            }
        }
        tracing::info!("Shutdown requested, draining in-flight requests");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    tracing::info!("Medigram API stopped");
    Ok(())
}
