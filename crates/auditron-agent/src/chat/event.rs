//! Client-facing relay events.

use serde::{Deserialize, Serialize};

/// Events emitted to the client during a conversation turn.
///
/// The wire shape is `{"type": "...", "content": "..."}`, one JSON object per
/// server-sent `data:` frame. Every turn ends with exactly one terminal event:
/// [`Complete`] after a clean stream, [`Error`] after a transport or agent
/// failure.
///
/// [`Complete`]: ChatEvent::Complete
/// [`Error`]: ChatEvent::Error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChatEvent {
    /// Progress note for a waiting indicator.
    Status { content: String },

    /// Incremental assistant text fragment.
    ///
    /// Carries only the new fragment; the client concatenates.
    Content { content: String },

    /// The turn finished; content is always empty.
    Complete { content: String },

    /// The turn failed; content is a human-readable message.
    Error { content: String },
}

impl ChatEvent {
    /// Creates a status event.
    pub fn status(content: impl Into<String>) -> Self {
        Self::Status {
            content: content.into(),
        }
    }

    /// Creates a content event carrying one fragment.
    pub fn content(content: impl Into<String>) -> Self {
        Self::Content {
            content: content.into(),
        }
    }

    /// Creates the terminal completion event.
    pub fn complete() -> Self {
        Self::Complete {
            content: String::new(),
        }
    }

    /// Creates the terminal error event.
    pub fn error(content: impl Into<String>) -> Self {
        Self::Error {
            content: content.into(),
        }
    }

    /// Returns true for the terminal variants.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape() {
        let event = ChatEvent::status("Processing your request...");

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "status", "content": "Processing your request..."})
        );
    }

    #[test]
    fn complete_has_empty_content() {
        let json = serde_json::to_value(ChatEvent::complete()).unwrap();
        assert_eq!(json, serde_json::json!({"type": "complete", "content": ""}));
    }

    #[test]
    fn terminal_variants() {
        assert!(ChatEvent::complete().is_terminal());
        assert!(ChatEvent::error("boom").is_terminal());
        assert!(!ChatEvent::status("working").is_terminal());
        assert!(!ChatEvent::content("text").is_terminal());
    }

    #[test]
    fn round_trips() {
        let event = ChatEvent::content("fragment");
        let json = serde_json::to_string(&event).unwrap();
        let parsed: ChatEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
