#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use auditron_server::service::ServiceState;
use axum::Router;
use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{Cli, ServerConfig};

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "auditron_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "auditron_cli::shutdown";

/// Maximum accepted request body size, in bytes.
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    log_startup_info();

    cli.server
        .validate()
        .context("invalid server configuration")?;
    cli.service
        .validate()
        .context("invalid service configuration")?;

    let state = ServiceState::from_config(&cli.service)
        .await
        .context("failed to create service state")?;
    let router = create_router(state, &cli.server)?;

    server::serve(router, cli.server).await?;

    Ok(())
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Trace (outermost) - request spans
/// 2. CORS
/// 3. Timeout - bounds time-to-first-response
/// 4. Body limit
/// 5. Routes (innermost) - actual request handlers
fn create_router(state: ServiceState, config: &ServerConfig) -> anyhow::Result<Router> {
    let cors = build_cors(&config.cors_allowed_origins)?;

    Ok(auditron_server::handler::routes(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

/// Builds the CORS layer from the configured origins.
///
/// An empty origin list means local development: allow everything.
fn build_cors(origins: &[String]) -> anyhow::Result<CorsLayer> {
    if origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }

    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("invalid CORS origin: {origin}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Logs startup information.
fn log_startup_info() {
    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting auditron server"
    );

    tracing::debug!(
        target: TRACING_TARGET_STARTUP,
        pid = process::id(),
        arch = std::env::consts::ARCH,
        os = std::env::consts::OS,
        "build information"
    );
}
