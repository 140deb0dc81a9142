//! Chat message types.

use serde::{Deserialize, Serialize};

/// Role of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instructions.
    System,
    /// User message.
    User,
    /// Assistant response.
    Assistant,
}

/// A message in the conversation transcript.
///
/// Messages are replayed verbatim to the agent on every turn, so the wire
/// shape is exactly `{role, content}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message role.
    role: MessageRole,

    /// Message content.
    content: String,
}

impl Message {
    /// Creates a message with an explicit role.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Returns the message role.
    pub fn role(&self) -> MessageRole {
        self.role
    }

    /// Returns the message content.
    pub fn content(&self) -> &str {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_roles() {
        let system = Message::system("You are a compliance assistant");
        let user = Message::user("Hello");
        let assistant = Message::assistant("Hi!");

        assert_eq!(system.role(), MessageRole::System);
        assert_eq!(user.role(), MessageRole::User);
        assert_eq!(assistant.role(), MessageRole::Assistant);
    }

    #[test]
    fn wire_shape_is_role_and_content() {
        let message = Message::user("Run an AWS audit");

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "Run an AWS audit"}));
    }
}
