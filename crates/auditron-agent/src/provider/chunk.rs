//! Opaque agent stream chunks.

use serde::{Deserialize, Serialize};

/// One unit of the agent's event stream.
///
/// The chunk schema belongs to the agent framework; only the fields the relay
/// dispatches on are modeled, and unknown fields are ignored so additional
/// chunk kinds pass through harmlessly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentChunk {
    /// Tool name, present on tool invocation results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Chunk content; a string for text and tool-result chunks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,

    /// Pending tool calls announced by the model; not dispatched on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<serde_json::Value>,
}

impl AgentChunk {
    /// Creates a text chunk (test and fixture helper).
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(serde_json::Value::String(content.into())),
            ..Self::default()
        }
    }

    /// Creates a tool-result chunk (test and fixture helper).
    pub fn tool(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            content: Some(serde_json::Value::String(content.into())),
            ..Self::default()
        }
    }

    /// Interprets this chunk as a tool invocation result.
    ///
    /// Returns the tool name and its string output; `None` if the chunk has
    /// no name or a non-string content.
    pub fn as_tool_result(&self) -> Option<(&str, &str)> {
        let name = self.name.as_deref().filter(|name| !name.is_empty())?;
        let content = self.content.as_ref()?.as_str()?;
        Some((name, content))
    }

    /// Interprets this chunk as incremental assistant text.
    ///
    /// Returns `None` for tool results, empty fragments and non-string
    /// content.
    pub fn as_text(&self) -> Option<&str> {
        if self.name.is_some() {
            return None;
        }
        self.content
            .as_ref()?
            .as_str()
            .filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_result_requires_name_and_string_content() {
        let chunk = AgentChunk::tool("aws_security_audit", "{\"success\":true}");
        assert_eq!(
            chunk.as_tool_result(),
            Some(("aws_security_audit", "{\"success\":true}"))
        );
        assert!(chunk.as_text().is_none());

        let text = AgentChunk::text("hello");
        assert!(text.as_tool_result().is_none());
    }

    #[test]
    fn empty_text_is_skipped() {
        let chunk = AgentChunk::text("");
        assert!(chunk.as_text().is_none());
    }

    #[test]
    fn non_string_content_is_neither() {
        let chunk: AgentChunk =
            serde_json::from_str(r#"{"content": {"parts": ["a", "b"]}}"#).unwrap();
        assert!(chunk.as_text().is_none());
        assert!(chunk.as_tool_result().is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let chunk: AgentChunk = serde_json::from_str(
            r#"{"id": "msg-1", "content": "hi", "type": "AIMessageChunk", "usage": {"tokens": 3}}"#,
        )
        .unwrap();

        assert_eq!(chunk.as_text(), Some("hi"));
    }

    #[test]
    fn tool_calls_only_chunk_is_ignored() {
        let chunk: AgentChunk = serde_json::from_str(
            r#"{"tool_calls": [{"name": "aws_security_audit", "args": {}}]}"#,
        )
        .unwrap();

        assert!(chunk.as_text().is_none());
        assert!(chunk.as_tool_result().is_none());
    }
}
