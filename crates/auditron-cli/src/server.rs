//! HTTP server startup and graceful shutdown.

use std::io;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix;

use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SHUTDOWN, TRACING_TARGET_STARTUP};

/// Starts the HTTP server with graceful shutdown.
///
/// # Errors
///
/// Returns an error if the listener cannot bind to the configured address or
/// the server encounters a fatal error during operation.
pub async fn serve(app: Router, config: ServerConfig) -> io::Result<()> {
    let addr = config.server_addr();
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        %addr,
        "Server is ready and listening for connections"
    );

    if config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_STARTUP,
            "Server is bound to all interfaces. Ensure firewall rules are properly configured."
        );
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.shutdown_timeout()))
        .await?;

    tracing::info!(target: TRACING_TARGET_SHUTDOWN, "Server shut down gracefully");
    Ok(())
}

/// Waits for a shutdown signal (SIGTERM or SIGINT/Ctrl+C).
async fn shutdown_signal(shutdown_timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!(
                target: TRACING_TARGET_SHUTDOWN,
                error = %e,
                "Failed to install Ctrl+C handler"
            );
        } else {
            tracing::info!(
                target: TRACING_TARGET_SHUTDOWN,
                "Received Ctrl+C signal, initiating graceful shutdown"
            );
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match unix::signal(unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                tracing::info!(
                    target: TRACING_TARGET_SHUTDOWN,
                    "Received SIGTERM signal, initiating graceful shutdown"
                );
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET_SHUTDOWN,
                    error = %e,
                    "Failed to install SIGTERM handler"
                );
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!(
        target: TRACING_TARGET_SHUTDOWN,
        timeout_secs = shutdown_timeout.as_secs(),
        "Graceful shutdown initiated"
    );
}
