//! Bearer-token authentication extractors.
//!
//! Token verification is delegated to the hosted auth service: the extractor
//! forwards the bearer token and receives the user it belongs to. There is
//! no local token parsing or key management.

use auditron_supabase::{AuthUser, SupabaseClient};
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::handler::{Error, ErrorKind};

/// Tracing target for authentication extraction.
const TRACING_TARGET: &str = "auditron_server::extract::auth";

/// Extractor for endpoints that require an authenticated user.
///
/// Rejects with 401 when the token is missing, invalid or expired.
#[derive(Debug, Clone)]
pub struct AuthState(pub AuthUser);

/// Extractor for endpoints where authentication is optional.
///
/// Resolves to `None` instead of rejecting; the handler decides what an
/// anonymous request means.
#[derive(Debug, Clone)]
pub struct MaybeAuthState(pub Option<AuthUser>);

/// Returns the bearer token from the `Authorization` header, if any.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl<S> FromRequestParts<S> for AuthState
where
    S: Send + Sync,
    SupabaseClient: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Err(ErrorKind::MissingAuthToken.into_error());
        };

        let supabase = SupabaseClient::from_ref(state);

        match supabase.get_user(token).await {
            Ok(user) => Ok(Self(user)),
            Err(auditron_supabase::Error::Auth(reason)) => {
                tracing::debug!(target: TRACING_TARGET, reason, "Token rejected");
                Err(ErrorKind::Unauthorized.into_error())
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Identity lookup failed"
                );
                Err(ErrorKind::InternalServerError
                    .with_message("Failed to verify credentials")
                    .into_static())
            }
        }
    }
}

impl<S> FromRequestParts<S> for MaybeAuthState
where
    S: Send + Sync,
    SupabaseClient: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(Self(None));
        };

        let supabase = SupabaseClient::from_ref(state);

        match supabase.get_user(token).await {
            Ok(user) => Ok(Self(Some(user))),
            Err(error) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Treating request as anonymous"
                );
                Ok(Self(None))
            }
        }
    }
}

impl aide::OperationInput for AuthState {}

impl aide::OperationInput for MaybeAuthState {}
