//! Streaming relay for one conversation turn.

use std::pin::Pin;
use std::task::{Context, Poll};

use auditron_core::ReportDocument;
use futures::stream::{BoxStream, Stream, StreamExt};

use super::ChatEvent;
use crate::Result;
use crate::provider::AgentChunkStream;
use crate::session::{SessionHandle, TurnGuard};

/// Tracing target for turn processing.
const TRACING_TARGET: &str = "auditron_agent::chat";

/// Status emitted before any network activity, so the client can render a
/// waiting indicator with zero latency.
const PROCESSING_STATUS: &str = "Processing your request...";

/// Lifecycle of a single turn.
///
/// `Idle` is implicit (no stream exists between turns); a new turn always
/// starts a fresh instance, there is no way back from a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
enum TurnState {
    AwaitingFirstByte,
    Streaming,
    Completed,
    Failed,
}

/// Streaming relay response for one turn.
///
/// Yields [`ChatEvent`]s in stream order and ends after the terminal event.
/// Dropping the stream mid-turn releases the agent connection and the
/// session's turn slot; an abandoned turn never mutates the session.
pub struct ChatStream {
    events: BoxStream<'static, ChatEvent>,
}

impl ChatStream {
    /// Relays one turn: drives the agent chunk stream obtained from
    /// `connect` and translates it into client events.
    ///
    /// The accumulated assistant text and any decoded report document are
    /// committed to the session exactly once, at clean stream exhaustion;
    /// failed and abandoned turns commit nothing.
    pub(crate) fn relay<F>(session: SessionHandle, guard: TurnGuard, connect: F) -> Self
    where
        F: Future<Output = Result<AgentChunkStream>> + Send + 'static,
    {
        let events = async_stream::stream! {
            // Holds the turn slot for exactly as long as this stream lives.
            let _guard = guard;

            let mut state = TurnState::AwaitingFirstByte;
            tracing::debug!(target: TRACING_TARGET, state = %state, "Turn started");

            yield ChatEvent::status(PROCESSING_STATUS);

            let mut chunks = match connect.await {
                Ok(chunks) => chunks,
                Err(error) => {
                    state = TurnState::Failed;
                    tracing::warn!(
                        target: TRACING_TARGET,
                        state = %state,
                        error = %error,
                        "Turn failed during handshake"
                    );
                    yield ChatEvent::error(format!("Error during analysis: {error}"));
                    return;
                }
            };

            state = TurnState::Streaming;
            tracing::debug!(target: TRACING_TARGET, state = %state, "Agent stream opened");

            let mut assistant_response = String::new();
            let mut document: Option<ReportDocument> = None;

            while let Some(next) = chunks.next().await {
                let chunk = match next {
                    Ok(chunk) => chunk,
                    Err(error) => {
                        state = TurnState::Failed;
                        tracing::warn!(
                            target: TRACING_TARGET,
                            state = %state,
                            error = %error,
                            "Turn failed mid-stream"
                        );
                        yield ChatEvent::error(format!("Error during analysis: {error}"));
                        return;
                    }
                };

                if let Some((tool, output)) = chunk.as_tool_result() {
                    yield ChatEvent::status(format!("Processing {tool} results..."));

                    // Best-effort capture; within a turn the last decodable
                    // payload wins.
                    if let Some(decoded) = ReportDocument::from_tool_output(output) {
                        tracing::debug!(
                            target: TRACING_TARGET,
                            tool,
                            file_name = %decoded.file_name,
                            "Report document captured"
                        );
                        document = Some(decoded);
                    }
                } else if let Some(text) = chunk.as_text() {
                    assistant_response.push_str(text);
                    yield ChatEvent::content(text.to_string());
                }
                // Any other chunk shape is ignored.
            }

            state = TurnState::Completed;
            tracing::debug!(
                target: TRACING_TARGET,
                state = %state,
                response_len = assistant_response.len(),
                captured_document = document.is_some(),
                "Turn completed"
            );

            session.commit_turn(assistant_response, document).await;
            yield ChatEvent::complete();
        };

        Self {
            events: events.boxed(),
        }
    }
}

impl Stream for ChatStream {
    type Item = ChatEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.events.as_mut().poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use futures::stream;

    use super::*;
    use crate::provider::AgentChunk;
    use crate::session::MessageRole;

    fn chunks(items: Vec<Result<AgentChunk>>) -> AgentChunkStream {
        stream::iter(items).boxed()
    }

    fn document_payload(file_name: &str) -> String {
        format!(
            r#"{{"success": true, "documentType": "SOC", "content": "<html></html>",
                "fileName": "{file_name}", "fileSize": "45 KB"}}"#
        )
    }

    async fn run_turn(session: &SessionHandle, items: Vec<Result<AgentChunk>>) -> Vec<ChatEvent> {
        let guard = session.begin_turn().expect("turn slot should be free");
        let stream = ChatStream::relay(session.clone(), guard, async move { Ok(chunks(items)) });
        stream.collect().await
    }

    #[tokio::test]
    async fn fragments_concatenate_and_turn_completes_once() {
        let session = SessionHandle::new();
        session.append(MessageRole::User, "audit my account").await;

        let events = run_turn(
            &session,
            vec![
                Ok(AgentChunk::text("A")),
                Ok(AgentChunk::text("B")),
                Ok(AgentChunk::text("C")),
            ],
        )
        .await;

        assert_eq!(events[0], ChatEvent::status("Processing your request..."));
        assert_eq!(events[1], ChatEvent::content("A"));
        assert_eq!(events[2], ChatEvent::content("B"));
        assert_eq!(events[3], ChatEvent::content("C"));
        assert_eq!(events[4], ChatEvent::complete());
        assert_eq!(events.len(), 5);

        let transcript = session.snapshot().await;
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].role(), MessageRole::Assistant);
        assert_eq!(transcript[1].content(), "ABC");
    }

    #[tokio::test]
    async fn tool_chunks_emit_status_and_capture_documents() {
        let session = SessionHandle::new();

        let events = run_turn(
            &session,
            vec![
                Ok(AgentChunk::tool(
                    "generate_soc_document",
                    document_payload("first.html"),
                )),
                Ok(AgentChunk::text("Report ready.")),
            ],
        )
        .await;

        assert_eq!(
            events[1],
            ChatEvent::status("Processing generate_soc_document results...")
        );
        assert_eq!(session.document().await.unwrap().file_name, "first.html");
    }

    #[tokio::test]
    async fn later_document_wins() {
        let session = SessionHandle::new();

        run_turn(
            &session,
            vec![
                Ok(AgentChunk::tool(
                    "generate_soc_document",
                    document_payload("first.html"),
                )),
                Ok(AgentChunk::tool(
                    "generate_iso_document",
                    document_payload("second.html"),
                )),
            ],
        )
        .await;

        assert_eq!(session.document().await.unwrap().file_name, "second.html");
    }

    #[tokio::test]
    async fn undecodable_tool_output_does_not_clear_capture() {
        let session = SessionHandle::new();

        run_turn(
            &session,
            vec![
                Ok(AgentChunk::tool(
                    "generate_soc_document",
                    document_payload("kept.html"),
                )),
                Ok(AgentChunk::tool("aws_security_audit", "{\"success\": true}")),
                Ok(AgentChunk::tool("aws_security_audit", "not json")),
            ],
        )
        .await;

        assert_eq!(session.document().await.unwrap().file_name, "kept.html");
    }

    #[tokio::test]
    async fn transport_failure_discards_partial_text() {
        let session = SessionHandle::new();
        session.append(MessageRole::User, "audit my account").await;

        let events = run_turn(
            &session,
            vec![
                Ok(AgentChunk::tool("aws_security_audit", "{}")),
                Ok(AgentChunk::text("partial")),
                Err(crate::Error::agent("connection reset")),
            ],
        )
        .await;

        let last = events.last().unwrap();
        assert!(matches!(last, ChatEvent::Error { .. }));
        assert_eq!(
            events.iter().filter(|event| event.is_terminal()).count(),
            1
        );

        // No assistant entry, no turn slot leak.
        let transcript = session.snapshot().await;
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].role(), MessageRole::User);
        assert!(!session.turn_in_progress());
    }

    #[tokio::test]
    async fn handshake_failure_emits_single_error() {
        let session = SessionHandle::new();
        let guard = session.begin_turn().unwrap();

        let stream = ChatStream::relay(session.clone(), guard, async {
            Err(crate::Error::agent("agent unreachable"))
        });
        let events: Vec<_> = stream.collect().await;

        assert_eq!(events[0], ChatEvent::status("Processing your request..."));
        assert_eq!(
            events[1],
            ChatEvent::error("Error during analysis: agent error: agent unreachable")
        );
        assert_eq!(events.len(), 2);
        assert!(!session.turn_in_progress());
    }

    #[tokio::test]
    async fn abandoned_turn_releases_slot_without_commit() {
        let session = SessionHandle::new();
        let guard = session.begin_turn().unwrap();

        let mut stream = ChatStream::relay(session.clone(), guard, async move {
            Ok(chunks(vec![
                Ok(AgentChunk::text("A")),
                Ok(AgentChunk::text("B")),
            ]))
        });

        // Consume the initial status, then walk away mid-turn.
        let first = stream.next().await.unwrap();
        assert!(matches!(first, ChatEvent::Status { .. }));
        assert!(session.turn_in_progress());
        drop(stream);

        assert!(!session.turn_in_progress());
        assert!(session.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn empty_response_appends_nothing() {
        let session = SessionHandle::new();

        let events = run_turn(&session, vec![]).await;

        assert_eq!(events.last().unwrap(), &ChatEvent::complete());
        assert!(session.snapshot().await.is_empty());
    }
}
