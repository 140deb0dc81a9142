//! Conversation session state.
//!
//! A [`ConversationSession`] holds the bounded transcript replayed to the
//! agent on every turn plus the most recently captured report document. One
//! session exists per end-user conversation; [`SessionHandle`] wraps it for
//! shared async access and enforces the at-most-one-turn-at-a-time rule.

mod message;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use auditron_core::ReportDocument;
pub use message::{Message, MessageRole};
use tokio::sync::Mutex;

/// Maximum number of transcript entries kept per session.
///
/// Bounds the context replayed to the agent; the oldest entries are evicted
/// first once the cap is reached.
const MAX_ENTRIES: usize = 20;

/// Tracing target for session operations.
const TRACING_TARGET: &str = "auditron_agent::session";

/// Bounded conversation state for a single end-user conversation.
#[derive(Debug, Default)]
pub struct ConversationSession {
    messages: Vec<Message>,
    document: Option<ReportDocument>,
}

impl ConversationSession {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, evicting from the front past [`MAX_ENTRIES`].
    pub fn append(&mut self, role: MessageRole, content: impl Into<String>) {
        self.messages.push(Message::new(role, content));

        if self.messages.len() > MAX_ENTRIES {
            let excess = self.messages.len() - MAX_ENTRIES;
            self.messages.drain(..excess);
        }
    }

    /// Returns an owned copy of the transcript, oldest first.
    ///
    /// Copying keeps callers from mutating session state through the
    /// returned value.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    /// Returns the number of transcript entries.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Empties the transcript and clears the stored document.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.document = None;
    }

    /// Stores a report document, replacing any previous one.
    pub fn set_document(&mut self, document: ReportDocument) {
        self.document = Some(document);
    }

    /// Returns the stored report document, if any.
    pub fn document(&self) -> Option<&ReportDocument> {
        self.document.as_ref()
    }

    /// Clears the stored report document.
    pub fn clear_document(&mut self) {
        self.document = None;
    }
}

/// Shared handle to a conversation session.
///
/// This type is cheap to clone; all clones refer to the same session. The
/// handle also carries the turn flag: a session runs at most one turn at a
/// time, and a second submission is rejected while one is in flight.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    state: Arc<Mutex<ConversationSession>>,
    turn_active: Arc<AtomicBool>,
}

impl SessionHandle {
    /// Creates a handle to a fresh empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry to the transcript.
    pub async fn append(&self, role: MessageRole, content: impl Into<String>) {
        self.state.lock().await.append(role, content);
    }

    /// Returns an owned copy of the transcript, oldest first.
    pub async fn snapshot(&self) -> Vec<Message> {
        self.state.lock().await.snapshot()
    }

    /// Returns the number of transcript entries.
    pub async fn history_len(&self) -> usize {
        self.state.lock().await.len()
    }

    /// Empties the transcript and clears the stored document.
    ///
    /// Resetting does not cancel an in-flight turn: if one is running, its
    /// terminal commit still lands in the (now empty) session. Callers that
    /// want cancellation must also drop the turn's event stream; the two
    /// operations race with last-write-wins semantics.
    pub async fn reset(&self) {
        self.state.lock().await.reset();
        tracing::debug!(target: TRACING_TARGET, "Session reset");
    }

    /// Returns the stored report document, if any.
    pub async fn document(&self) -> Option<ReportDocument> {
        self.state.lock().await.document().cloned()
    }

    /// Clears the stored report document.
    pub async fn clear_document(&self) {
        self.state.lock().await.clear_document();
    }

    /// Returns true if a turn is currently in flight.
    pub fn turn_in_progress(&self) -> bool {
        self.turn_active.load(Ordering::Acquire)
    }

    /// Claims the turn slot, or returns `None` if a turn is in flight.
    pub(crate) fn begin_turn(&self) -> Option<TurnGuard> {
        self.turn_active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| TurnGuard {
                active: Arc::clone(&self.turn_active),
            })
    }

    /// Applies a completed turn's results.
    ///
    /// Called exactly once per successful turn, after the agent stream is
    /// exhausted. A turn that produced no text appends nothing; a turn that
    /// produced no document leaves the previous document untouched.
    pub(crate) async fn commit_turn(
        &self,
        assistant_text: String,
        document: Option<ReportDocument>,
    ) {
        let mut session = self.state.lock().await;

        if !assistant_text.is_empty() {
            session.append(MessageRole::Assistant, assistant_text);
        }
        if let Some(document) = document {
            session.set_document(document);
        }
    }
}

/// RAII guard for the per-session turn slot.
///
/// Dropping the guard releases the slot, whether the turn completed, failed
/// or was abandoned mid-stream.
#[derive(Debug)]
pub(crate) struct TurnGuard {
    active: Arc<AtomicBool>,
}

impl Drop for TurnGuard {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use auditron_core::ReportKind;

    use super::*;

    fn document(name: &str) -> ReportDocument {
        ReportDocument {
            content: "<html></html>".to_string(),
            file_name: name.to_string(),
            file_size: "1 KB".to_string(),
            document_type: ReportKind::Soc,
        }
    }

    #[test]
    fn transcript_is_bounded() {
        let mut session = ConversationSession::new();

        for i in 0..25 {
            session.append(MessageRole::User, format!("message {i}"));
        }

        assert_eq!(session.len(), MAX_ENTRIES);

        // The survivors are the most recent 20, in insertion order.
        let snapshot = session.snapshot();
        assert_eq!(snapshot.first().unwrap().content(), "message 5");
        assert_eq!(snapshot.last().unwrap().content(), "message 24");
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut session = ConversationSession::new();
        session.append(MessageRole::User, "hello");

        let mut snapshot = session.snapshot();
        snapshot.clear();

        assert_eq!(session.len(), 1);
    }

    #[test]
    fn reset_clears_transcript_and_document() {
        let mut session = ConversationSession::new();
        session.append(MessageRole::User, "hello");
        session.set_document(document("r.html"));

        session.reset();

        assert!(session.is_empty());
        assert!(session.snapshot().is_empty());
        assert!(session.document().is_none());
    }

    #[test]
    fn new_document_replaces_previous() {
        let mut session = ConversationSession::new();
        session.set_document(document("first.html"));
        session.set_document(document("second.html"));

        assert_eq!(session.document().unwrap().file_name, "second.html");
    }

    #[tokio::test]
    async fn turn_slot_is_exclusive() {
        let handle = SessionHandle::new();

        let guard = handle.begin_turn();
        assert!(guard.is_some());
        assert!(handle.turn_in_progress());
        assert!(handle.begin_turn().is_none());

        drop(guard);
        assert!(!handle.turn_in_progress());
        assert!(handle.begin_turn().is_some());
    }

    #[tokio::test]
    async fn commit_skips_empty_text_and_keeps_previous_document() {
        let handle = SessionHandle::new();
        handle.append(MessageRole::User, "generate a report").await;
        handle.commit_turn(String::new(), Some(document("r.html"))).await;

        assert_eq!(handle.history_len().await, 1);
        assert!(handle.document().await.is_some());

        // A later turn with no document leaves the stored one alone.
        handle.commit_turn("done".to_string(), None).await;
        assert_eq!(handle.history_len().await, 2);
        assert_eq!(handle.document().await.unwrap().file_name, "r.html");
    }
}
