//! Transcript repository for chat history persistence.
//!
//! Transcript writes are fire-and-forget from the relay's point of view: a
//! completed turn spawns a save and never awaits it, so a slow or failing
//! backend cannot stall or fail a conversation.

use std::future::Future;

use jiff::Timestamp;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, SupabaseClient, TRACING_TARGET_CLIENT};

/// Table holding one transcript row per user.
const TABLE: &str = "chat_transcripts";

/// A persisted chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptRow {
    /// Owning user.
    pub user_id: Uuid,

    /// Transcript entries as stored, oldest first.
    pub messages: serde_json::Value,

    /// Last modification time, set by the database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

/// Repository for transcript row operations.
pub trait TranscriptRepository {
    /// Replaces the stored transcript for a user.
    fn save_transcript(
        &self,
        user_id: Uuid,
        messages: serde_json::Value,
    ) -> impl Future<Output = Result<()>> + Send;
}

impl TranscriptRepository for SupabaseClient {
    async fn save_transcript(&self, user_id: Uuid, messages: serde_json::Value) -> Result<()> {
        let row = TranscriptRow {
            user_id,
            messages,
            updated_at: None,
        };

        let response = self
            .rest_request(Method::POST, TABLE)?
            .query(&[("on_conflict", "user_id")])
            .header("Prefer", "resolution=merge-duplicates")
            .json(&row)
            .send()
            .await?;

        Self::error_for_status(response).await?;

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            %user_id,
            "Transcript saved"
        );

        Ok(())
    }
}
