//! Credential handlers.
//!
//! CRUD for the authenticated user's cloud provider credentials. All
//! operations require authentication and pass a per-user rate limit; the
//! credential payloads themselves live in the hosted database, keyed by user
//! ID.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use auditron_supabase::SupabaseClient;
use auditron_supabase::query::CredentialsRepository;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::extract::{AuthState, ValidateJson};
use crate::handler::request::UpsertCredentials;
use crate::handler::response::{
    Ack, CredentialsResponse, ErrorResponse, SaveCredentialsResponse,
};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{RateLimiter, ServiceState};

/// Tracing target for credential operations.
const TRACING_TARGET: &str = "auditron_server::handler::credentials";

/// Returns the stored credentials for the authenticated user.
#[tracing::instrument(skip_all, fields(user_id = %auth_state.0.id))]
async fn get_credentials(
    State(supabase): State<SupabaseClient>,
    State(rate_limiter): State<RateLimiter>,
    auth_state: AuthState,
) -> Result<(StatusCode, Json<CredentialsResponse>)> {
    rate_limiter.check(auth_state.0.id).await?;

    let row = supabase
        .find_credentials(auth_state.0.id)
        .await
        .map_err(map_store_error)?;

    let credentials = row.map(|row| row.credentials).unwrap_or_default();

    tracing::debug!(
        target: TRACING_TARGET,
        providers = credentials.providers().len(),
        "Credentials read"
    );

    Ok((StatusCode::OK, Json(CredentialsResponse { credentials })))
}

fn get_credentials_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get credentials")
        .description("Returns the stored cloud provider credentials, or the empty set.")
        .response::<200, Json<CredentialsResponse>>()
        .response::<401, Json<ErrorResponse<'static>>>()
        .response::<429, Json<ErrorResponse<'static>>>()
}

/// Saves (inserts or merges) cloud provider credentials.
#[tracing::instrument(skip_all, fields(user_id = %auth_state.0.id))]
async fn save_credentials(
    State(supabase): State<SupabaseClient>,
    State(rate_limiter): State<RateLimiter>,
    auth_state: AuthState,
    ValidateJson(request): ValidateJson<UpsertCredentials>,
) -> Result<(StatusCode, Json<SaveCredentialsResponse>)> {
    rate_limiter.check(auth_state.0.id).await?;

    let credentials = request.into_credential_set();

    credentials.validate().map_err(|error| {
        ErrorKind::BadRequest
            .with_message(error.to_string())
            .with_resource("credentials")
            .into_static()
    })?;

    let row = supabase
        .upsert_credentials(auth_state.0.id, credentials)
        .await
        .map_err(map_store_error)?;

    tracing::info!(
        target: TRACING_TARGET,
        providers = row.credentials.providers().len(),
        "Credentials saved"
    );

    Ok((
        StatusCode::OK,
        Json(SaveCredentialsResponse {
            success: true,
            credentials: row.credentials,
        }),
    ))
}

fn save_credentials_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Save credentials")
        .description("Inserts or merges per-provider credential payloads.")
        .response::<200, Json<SaveCredentialsResponse>>()
        .response::<400, Json<ErrorResponse<'static>>>()
        .response::<401, Json<ErrorResponse<'static>>>()
        .response::<429, Json<ErrorResponse<'static>>>()
}

fn update_credentials_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update credentials")
        .description("Same semantics as saving: providers present in the payload are replaced.")
        .response::<200, Json<SaveCredentialsResponse>>()
        .response::<400, Json<ErrorResponse<'static>>>()
        .response::<401, Json<ErrorResponse<'static>>>()
        .response::<429, Json<ErrorResponse<'static>>>()
}

/// Deletes the stored credentials for the authenticated user.
#[tracing::instrument(skip_all, fields(user_id = %auth_state.0.id))]
async fn delete_credentials(
    State(supabase): State<SupabaseClient>,
    State(rate_limiter): State<RateLimiter>,
    auth_state: AuthState,
) -> Result<(StatusCode, Json<Ack>)> {
    rate_limiter.check(auth_state.0.id).await?;

    supabase
        .delete_credentials(auth_state.0.id)
        .await
        .map_err(map_store_error)?;

    tracing::info!(target: TRACING_TARGET, "Credentials deleted");

    Ok((StatusCode::OK, Json(Ack::ok())))
}

fn delete_credentials_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete credentials")
        .description("Removes every stored provider payload for the user.")
        .response::<200, Json<Ack>>()
        .response::<401, Json<ErrorResponse<'static>>>()
        .response::<429, Json<ErrorResponse<'static>>>()
}

/// Maps hosted backend failures onto the HTTP error taxonomy.
fn map_store_error(error: auditron_supabase::Error) -> Error<'static> {
    tracing::error!(target: TRACING_TARGET, error = %error, "Credential store call failed");

    ErrorKind::InternalServerError
        .with_message("Failed to access stored credentials")
        .with_context(error.to_string())
        .into_static()
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/credentials",
            get_with(get_credentials, get_credentials_docs)
                .post_with(save_credentials, save_credentials_docs)
                .put_with(save_credentials, update_credentials_docs)
                .delete_with(delete_credentials, delete_credentials_docs),
        )
        .with_path_items(|item| item.tag("Credentials"))
}
