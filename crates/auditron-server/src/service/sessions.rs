//! Per-user conversation session registry.

use std::collections::HashMap;
use std::sync::Arc;

use auditron_agent::SessionHandle;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Tracing target for session registry operations.
const TRACING_TARGET: &str = "auditron_server::service::sessions";

/// Registry of conversation sessions, one per end user.
///
/// Sessions live for the process lifetime; transcript persistence across
/// restarts is the hosted backend's job. Keeping one session per user (not
/// one per process) prevents conversation bleed between tenants.
///
/// This type is cheap to clone and can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<Mutex<HashMap<Uuid, SessionHandle>>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for a user, creating it on first contact.
    pub async fn handle_for(&self, user_id: Uuid) -> SessionHandle {
        let mut sessions = self.inner.lock().await;

        sessions
            .entry(user_id)
            .or_insert_with(|| {
                tracing::debug!(target: TRACING_TARGET, %user_id, "Session created");
                SessionHandle::new()
            })
            .clone()
    }

    /// Returns the number of live sessions.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Returns true if no sessions exist.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use auditron_agent::MessageRole;

    use super::*;

    #[tokio::test]
    async fn same_user_gets_same_session() {
        let registry = SessionRegistry::new();
        let user_id = Uuid::new_v4();

        let first = registry.handle_for(user_id).await;
        first.append(MessageRole::User, "hello").await;

        let second = registry.handle_for(user_id).await;
        assert_eq!(second.history_len().await, 1);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let registry = SessionRegistry::new();

        let alice = registry.handle_for(Uuid::new_v4()).await;
        let bob = registry.handle_for(Uuid::new_v4()).await;

        alice.append(MessageRole::User, "alice's message").await;

        assert_eq!(bob.history_len().await, 0);
        assert_eq!(registry.len().await, 2);
    }
}
