//! Chat relay handlers.
//!
//! ## Streaming
//!
//! `POST /chat` with `stream: true` uses Server-Sent Events to relay the
//! agent's response back to the client as `data: <json>` frames. Clients can
//! cancel a turn by closing the connection (e.g. using `AbortController` in
//! JavaScript); the relay releases the agent stream and leaves the session
//! untouched.

use std::convert::Infallible;

use aide::axum::ApiRouter;
use auditron_agent::{ChatEvent, ChatService, ChatStream, SessionHandle};
use auditron_supabase::SupabaseClient;
use auditron_supabase::query::TranscriptRepository;
use axum::Json;
use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use uuid::Uuid;

use crate::extract::{AuthState, MaybeAuthState, ValidateJson};
use crate::handler::request::{ChatAction, ChatQuery, SendChatMessage};
use crate::handler::response::{Ack, ChatHistory, ChatReply, DocumentData, InitResponse};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{ServiceState, SessionRegistry};

/// Tracing target for chat relay operations.
const TRACING_TARGET: &str = "auditron_server::handler::chat";

/// Turn outcome shown to anonymous users instead of running the agent.
const AUTH_REQUIRED_MESSAGE: &str = "Please sign in before using the compliance assistant. \
Running audits and generating reports requires an authenticated account.";

/// Sends a message through the relay.
///
/// With `stream: true` the response is a Server-Sent Event stream of relay
/// events, terminated by exactly one `complete` or `error` frame; otherwise
/// the full response text is returned as JSON.
///
/// An unauthenticated request is a normal turn outcome: the warning text is
/// delivered the same way a response would be, not as a protocol error.
#[tracing::instrument(skip_all, fields(stream = request.stream))]
async fn send_message(
    State(chat): State<ChatService>,
    State(sessions): State<SessionRegistry>,
    State(supabase): State<SupabaseClient>,
    MaybeAuthState(user): MaybeAuthState,
    ValidateJson(request): ValidateJson<SendChatMessage>,
) -> Result<Response> {
    let Some(user) = user else {
        tracing::debug!(target: TRACING_TARGET, "Anonymous turn, returning sign-in warning");
        return Ok(warning_response(request.stream));
    };

    tracing::debug!(target: TRACING_TARGET, user_id = %user.id, "Sending chat message");

    let session = sessions.handle_for(user.id).await;

    if !request.stream {
        let response = chat
            .send_message_sync(&session, &request.message)
            .await
            .map_err(map_turn_error)?;

        spawn_transcript_save(supabase, user.id, session);
        return Ok(Json(ChatReply { response }).into_response());
    }

    let chat_stream = chat
        .send_message(&session, &request.message)
        .await
        .map_err(map_turn_error)?;

    Ok(relay_sse(chat_stream, supabase, user.id, session))
}

/// Bridges a relay stream onto an SSE response.
///
/// Events are serialized into `data:` frames through a bounded channel; a
/// failed send means the client disconnected, which cancels the turn by
/// dropping the relay stream.
fn relay_sse(
    chat_stream: ChatStream,
    supabase: SupabaseClient,
    user_id: Uuid,
    session: SessionHandle,
) -> Response {
    let (tx, rx) = tokio::sync::mpsc::channel::<std::result::Result<Event, Infallible>>(32);

    tokio::spawn(async move {
        let mut stream = std::pin::pin!(chat_stream);
        let mut completed = false;

        while let Some(chat_event) = stream.next().await {
            if matches!(chat_event, ChatEvent::Complete { .. }) {
                completed = true;
            }

            let event = match serde_json::to_string(&chat_event) {
                Ok(json) => Event::default().data(json),
                Err(error) => {
                    tracing::error!(
                        target: TRACING_TARGET,
                        error = %error,
                        "Failed to serialize chat event"
                    );
                    continue;
                }
            };

            // Send the event; if send fails, client disconnected (cancelled)
            if tx.send(Ok(event)).await.is_err() {
                tracing::info!(
                    target: TRACING_TARGET,
                    %user_id,
                    "Client disconnected, cancelling turn"
                );
                break;
            }
        }

        tracing::debug!(target: TRACING_TARGET, %user_id, completed, "Turn stream drained");

        if completed {
            spawn_transcript_save(supabase, user_id, session);
        }
    });

    Sse::new(ReceiverStream::new(rx))
        .keep_alive(KeepAlive::default())
        .into_response()
}

/// Builds the sign-in warning in whichever shape the client asked for.
fn warning_response(stream: bool) -> Response {
    if !stream {
        return Json(ChatReply {
            response: AUTH_REQUIRED_MESSAGE.to_string(),
        })
        .into_response();
    }

    let frames = [
        ChatEvent::content(AUTH_REQUIRED_MESSAGE),
        ChatEvent::complete(),
    ]
    .into_iter()
    .map(|chat_event| {
        let json = serde_json::to_string(&chat_event).unwrap_or_default();
        Ok::<_, Infallible>(Event::default().data(json))
    });

    Sse::new(futures::stream::iter(frames)).into_response()
}

/// Maps relay rejections onto the HTTP error taxonomy.
fn map_turn_error(error: auditron_agent::Error) -> Error<'static> {
    match error {
        auditron_agent::Error::EmptyMessage => ErrorKind::BadRequest
            .with_message("Message is required and must be a string")
            .into_static(),
        auditron_agent::Error::TurnInProgress => ErrorKind::Conflict
            .with_message("A response is already being generated for this conversation")
            .into_static(),
        error => {
            tracing::error!(target: TRACING_TARGET, error = %error, "Failed to run turn");
            ErrorKind::InternalServerError
                .with_message("Failed to process chat message")
                .with_context(error.to_string())
                .into_static()
        }
    }
}

/// Persists the transcript without blocking or failing the turn.
fn spawn_transcript_save(supabase: SupabaseClient, user_id: Uuid, session: SessionHandle) {
    tokio::spawn(async move {
        let history = session.snapshot().await;

        let messages = match serde_json::to_value(&history) {
            Ok(messages) => messages,
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Failed to serialize transcript"
                );
                return;
            }
        };

        if let Err(error) = supabase.save_transcript(user_id, messages).await {
            tracing::warn!(
                target: TRACING_TARGET,
                %user_id,
                error = %error,
                "Transcript save failed"
            );
        }
    });
}

/// Reads the transcript or the last generated document.
#[tracing::instrument(skip_all, fields(user_id = %auth_state.0.id, action = ?query.action))]
async fn get_chat(
    State(sessions): State<SessionRegistry>,
    auth_state: AuthState,
    Query(query): Query<ChatQuery>,
) -> Result<Response> {
    let session = sessions.handle_for(auth_state.0.id).await;

    let response = match query.action {
        ChatAction::History => {
            Json(ChatHistory::from_snapshot(session.snapshot().await)).into_response()
        }
        ChatAction::Document => Json(DocumentData {
            document_data: session.document().await,
        })
        .into_response(),
    };

    Ok(response)
}

/// Resets the conversation.
///
/// An in-flight turn is not cancelled; its completion lands in the emptied
/// session (last write wins). The client disables input while a turn runs,
/// so the race window is the connection teardown only.
#[tracing::instrument(skip_all, fields(user_id = %auth_state.0.id))]
async fn reset_chat(
    State(sessions): State<SessionRegistry>,
    auth_state: AuthState,
) -> Result<Json<Ack>> {
    let session = sessions.handle_for(auth_state.0.id).await;
    session.reset().await;

    tracing::info!(target: TRACING_TARGET, "Conversation reset");

    Ok(Json(Ack::ok()))
}

/// (Re)initializes the agent connection.
///
/// Re-runs tool discovery against the audit protocol service; exhausted
/// retries degrade to the built-in document tools rather than failing.
#[tracing::instrument(skip_all, fields(user_id = %auth_state.0.id))]
async fn init_agent(
    State(chat): State<ChatService>,
    auth_state: AuthState,
) -> Result<Json<InitResponse>> {
    let catalog = chat.initialize().await;

    tracing::info!(
        target: TRACING_TARGET,
        audit_tool_count = catalog.audit_tool_count(),
        degraded = catalog.is_degraded(),
        "Agent reinitialized"
    );

    Ok(Json(InitResponse {
        success: true,
        degraded: catalog.is_degraded(),
        audit_tool_count: catalog.audit_tool_count(),
    }))
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    // SSE endpoint - uses regular axum routing as aide doesn't support SSE
    // in OpenAPI
    ApiRouter::new().route(
        "/chat",
        axum::routing::post(send_message)
            .get(get_chat)
            .put(reset_chat)
            .patch(init_agent),
    )
}
