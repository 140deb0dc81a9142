//! Chat service for running conversation turns.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::RwLock;

use super::{ChatEvent, ChatStream, SYSTEM_PREAMBLE, with_preamble};
use crate::provider::AgentClient;
use crate::session::{MessageRole, SessionHandle};
use crate::tool::{ToolCatalog, ToolDiscovery};
use crate::{Error, Result};

/// Tracing target for chat service operations.
const TRACING_TARGET: &str = "auditron_agent::chat";

/// Inner state for [`ChatService`].
struct ChatServiceInner {
    agent: AgentClient,
    discovery: Option<ToolDiscovery>,
    tools: RwLock<ToolCatalog>,
}

/// Entry point for running conversation turns.
///
/// This type is cheap to clone and can be shared across threads. One service
/// instance serves every session; per-conversation state lives in the
/// [`SessionHandle`] passed to each call.
#[derive(Clone)]
pub struct ChatService {
    inner: Arc<ChatServiceInner>,
}

impl ChatService {
    /// Creates a service with only the built-in document tools.
    pub fn new(agent: AgentClient) -> Self {
        Self::build(agent, None)
    }

    /// Creates a service that discovers audit tools from the audit protocol
    /// service.
    pub fn with_discovery(agent: AgentClient, discovery: ToolDiscovery) -> Self {
        Self::build(agent, Some(discovery))
    }

    fn build(agent: AgentClient, discovery: Option<ToolDiscovery>) -> Self {
        Self {
            inner: Arc::new(ChatServiceInner {
                agent,
                discovery,
                tools: RwLock::new(ToolCatalog::builtin()),
            }),
        }
    }

    /// (Re)initializes the tool catalog.
    ///
    /// Runs discovery when an audit service is configured, falling back to
    /// the built-in capability set on exhaustion; never fails.
    pub async fn initialize(&self) -> ToolCatalog {
        let catalog = match &self.inner.discovery {
            Some(discovery) => discovery.discover().await,
            None => ToolCatalog::builtin(),
        };

        tracing::info!(
            target: TRACING_TARGET,
            audit_tools = catalog.audit_tool_count(),
            degraded = catalog.is_degraded(),
            "Tool catalog initialized"
        );

        *self.inner.tools.write().await = catalog.clone();
        catalog
    }

    /// Returns a snapshot of the current tool catalog.
    pub async fn tools(&self) -> ToolCatalog {
        self.inner.tools.read().await.clone()
    }

    /// Runs one streaming conversation turn.
    ///
    /// Appends the user message to the session, then returns the relay
    /// stream for the turn. The accumulated response is committed to the
    /// session only when the stream ends cleanly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyMessage`] for empty/whitespace input and
    /// [`Error::TurnInProgress`] while another turn is in flight; both leave
    /// the session untouched and emit no events.
    pub async fn send_message(&self, session: &SessionHandle, message: &str) -> Result<ChatStream> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::EmptyMessage);
        }

        let Some(guard) = session.begin_turn() else {
            tracing::debug!(target: TRACING_TARGET, "Turn rejected: one already in flight");
            return Err(Error::TurnInProgress);
        };

        // A new user message starts a fresh document cycle.
        session.clear_document().await;
        session.append(MessageRole::User, message).await;

        let history = session.snapshot().await;
        let payload = with_preamble(SYSTEM_PREAMBLE, &history);

        tracing::debug!(
            target: TRACING_TARGET,
            history_len = history.len(),
            "Starting turn"
        );

        let agent = self.inner.agent.clone();
        let connect = async move { agent.stream_chat(&payload).await };

        Ok(ChatStream::relay(session.clone(), guard, connect))
    }

    /// Runs one turn to completion and returns the full response text.
    ///
    /// Drives the same relay as [`send_message`]; session effects are
    /// identical.
    ///
    /// [`send_message`]: ChatService::send_message
    pub async fn send_message_sync(
        &self,
        session: &SessionHandle,
        message: &str,
    ) -> Result<String> {
        let mut stream = self.send_message(session, message).await?;
        let mut response = String::new();

        while let Some(event) = stream.next().await {
            match event {
                ChatEvent::Content { content } => response.push_str(&content),
                ChatEvent::Error { content } => return Err(Error::agent(content)),
                ChatEvent::Status { .. } | ChatEvent::Complete { .. } => {}
            }
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::provider::AgentConfig;
    use crate::session::Message;

    fn service() -> ChatService {
        let config = AgentConfig::new(Url::parse("http://127.0.0.1:9/v1/chat").unwrap());
        ChatService::new(AgentClient::new(config).unwrap())
    }

    #[tokio::test]
    async fn empty_message_is_rejected_without_mutation() {
        let service = service();
        let session = SessionHandle::new();

        for message in ["", "   ", "\n\t"] {
            let result = service.send_message(&session, message).await;
            assert!(matches!(result, Err(Error::EmptyMessage)));
        }

        assert_eq!(session.history_len().await, 0);
        assert!(!session.turn_in_progress());
    }

    #[tokio::test]
    async fn concurrent_turn_is_rejected_without_mutation() {
        let service = service();
        let session = SessionHandle::new();

        let first = service.send_message(&session, "first").await.unwrap();
        assert!(session.turn_in_progress());

        let second = service.send_message(&session, "second").await;
        assert!(matches!(second, Err(Error::TurnInProgress)));

        // Only the first turn's user message landed.
        let transcript = session.snapshot().await;
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0], Message::user("first"));

        drop(first);
        assert!(!session.turn_in_progress());
    }

    #[tokio::test]
    async fn turn_start_appends_user_message_and_clears_document() {
        let service = service();
        let session = SessionHandle::new();
        session
            .commit_turn(
                String::new(),
                Some(auditron_core::ReportDocument {
                    content: "<html></html>".to_string(),
                    file_name: "old.html".to_string(),
                    file_size: "1 KB".to_string(),
                    document_type: auditron_core::ReportKind::Iso,
                }),
            )
            .await;

        let stream = service.send_message(&session, "  run an audit  ").await.unwrap();

        // Appended (trimmed) before any network contact; document cycle reset.
        let transcript = session.snapshot().await;
        assert_eq!(transcript[0], Message::user("run an audit"));
        assert!(session.document().await.is_none());

        drop(stream);
    }

    #[tokio::test]
    async fn builtin_catalog_without_discovery() {
        let service = service();

        let catalog = service.initialize().await;
        assert!(catalog.is_degraded());
        assert_eq!(catalog.audit_tool_count(), 0);
        assert_eq!(service.tools().await.audit_tool_count(), 0);
    }
}
