//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod chat;
mod credentials;
mod error;
pub mod request;
pub mod response;

use aide::axum::ApiRouter;
use aide::openapi::OpenApi;
use axum::{Extension, Router};
pub use error::{Error, ErrorKind, Result};

use crate::service::ServiceState;

/// Builds the complete application router.
///
/// Documented JSON routes are collected into the OpenAPI description; the
/// SSE relay routes are registered outside it.
pub fn routes(state: ServiceState) -> Router {
    let mut api = OpenApi::default();

    ApiRouter::new()
        .merge(chat::routes())
        .merge(credentials::routes())
        .finish_api(&mut api)
        .layer(Extension(std::sync::Arc::new(api)))
        .with_state(state)
}
