//! Chat response types.

use auditron_agent::Message;
use auditron_core::ReportDocument;
use serde::Serialize;

/// Synchronous (non-streaming) chat reply.
#[must_use]
#[derive(Debug, Serialize)]
pub struct ChatReply {
    /// Full assistant response text.
    pub response: String,
}

/// Conversation transcript read.
#[must_use]
#[derive(Debug, Serialize)]
pub struct ChatHistory {
    /// Transcript entries, oldest first.
    pub history: Vec<Message>,

    /// Number of entries.
    pub length: usize,
}

impl ChatHistory {
    /// Creates a history response from a transcript snapshot.
    pub fn from_snapshot(history: Vec<Message>) -> Self {
        Self {
            length: history.len(),
            history,
        }
    }
}

/// Last generated report document read.
#[must_use]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentData {
    /// The stored document, or `null` when no turn has produced one.
    pub document_data: Option<ReportDocument>,
}

/// Result of (re)initializing the agent connection.
#[must_use]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitResponse {
    /// Always true; configuration failures surface as 500s.
    pub success: bool,

    /// True when tool discovery fell back to the built-in capability set.
    pub degraded: bool,

    /// Number of audit tools currently available to the agent.
    pub audit_tool_count: usize,
}
