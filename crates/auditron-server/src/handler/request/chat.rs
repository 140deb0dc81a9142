//! Chat request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for sending a chat message.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
pub struct SendChatMessage {
    /// The message content to send.
    #[validate(length(min = 1, max = 32000))]
    pub message: String,

    /// Stream the response as server-sent events instead of returning a
    /// single JSON reply.
    #[serde(default)]
    pub stream: bool,
}

/// Which piece of chat state to read.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChatAction {
    /// The conversation transcript.
    #[default]
    History,
    /// The last generated report document.
    Document,
}

/// Query parameters for reading chat state.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ChatQuery {
    /// Requested read; defaults to the transcript.
    #[serde(default)]
    pub action: ChatAction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_defaults_to_false() {
        let request: SendChatMessage = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert!(!request.stream);
    }

    #[test]
    fn empty_message_fails_validation() {
        let request: SendChatMessage = serde_json::from_str(r#"{"message": ""}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn action_parses_lowercase() {
        let query: ChatQuery = serde_json::from_str(r#"{"action": "document"}"#).unwrap();
        assert_eq!(query.action, ChatAction::Document);

        let query: ChatQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.action, ChatAction::History);
    }
}
