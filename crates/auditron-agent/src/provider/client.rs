//! Agent client implementation.
//!
//! Submits the per-turn message payload and exposes the agent's response as a
//! stream of [`AgentChunk`]s parsed out of `data:` frames. Frames that are
//! not valid JSON are skipped; a `[DONE]` sentinel or the end of the body
//! terminates the stream.

use futures::stream::{BoxStream, Stream, StreamExt};
use reqwest::{Client as HttpClient, ClientBuilder};
use serde::Serialize;

use super::{AgentChunk, AgentConfig};
use crate::session::Message;
use crate::{Error, Result};

/// Tracing target for agent client operations.
const TRACING_TARGET: &str = "auditron_agent::provider";

/// Chunk stream for one conversation turn.
pub type AgentChunkStream = BoxStream<'static, Result<AgentChunk>>;

/// Request payload for the agent's chat endpoint.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: &'a [Message],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

/// Client for the hosted agent endpoint.
///
/// This type is cheap to clone and can be shared across threads.
#[derive(Debug, Clone)]
pub struct AgentClient {
    http_client: HttpClient,
    config: AgentConfig,
}

impl AgentClient {
    /// Creates a new agent client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: AgentConfig) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET,
            agent_url = %config.agent_url,
            "Creating agent client"
        );

        // Only the handshake is bounded; established streams run until the
        // agent closes them or the consumer goes away.
        let http_client = ClientBuilder::new()
            .connect_timeout(config.connect_timeout())
            .user_agent(concat!("auditron/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Opens a turn against the agent and returns its chunk stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the handshake fails or the agent rejects the
    /// request; errors past the handshake surface as stream items.
    pub async fn stream_chat(&self, messages: &[Message]) -> Result<AgentChunkStream> {
        let body = ChatRequest {
            messages,
            stream: true,
            model: self.config.agent_model.as_deref(),
        };

        let mut request = self
            .http_client
            .post(self.config.agent_url.clone())
            .json(&body);

        if let Some(api_key) = &self.config.agent_api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());

            tracing::warn!(
                target: TRACING_TARGET,
                status,
                message,
                "Agent rejected turn"
            );

            return Err(Error::provider("agent", format!("status {status}: {message}")));
        }

        tracing::debug!(
            target: TRACING_TARGET,
            message_count = messages.len(),
            "Agent stream opened"
        );

        Ok(into_chunk_stream(response).boxed())
    }
}

/// Parses a streaming response body into agent chunks.
fn into_chunk_stream(response: reqwest::Response) -> impl Stream<Item = Result<AgentChunk>> {
    async_stream::stream! {
        let mut body = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();

        'read: while let Some(next) = body.next().await {
            let bytes = match next {
                Ok(bytes) => bytes,
                Err(error) => {
                    yield Err(Error::Http(error));
                    break 'read;
                }
            };

            buffer.extend_from_slice(&bytes);

            while let Some(newline) = buffer.iter().position(|byte| *byte == b'\n') {
                let line: Vec<u8> = buffer.drain(..=newline).collect();
                let Some(data) = frame_data(&line) else {
                    continue;
                };

                if data == "[DONE]" {
                    break 'read;
                }

                match serde_json::from_str::<AgentChunk>(&data) {
                    Ok(chunk) => yield Ok(chunk),
                    Err(error) => {
                        tracing::trace!(
                            target: TRACING_TARGET,
                            error = %error,
                            "Skipping malformed frame"
                        );
                    }
                }
            }
        }
    }
}

/// Extracts the payload of one `data:` frame, if the line carries one.
fn frame_data(line: &[u8]) -> Option<String> {
    let line = String::from_utf8_lossy(line);
    let data = line.trim().strip_prefix("data:")?.trim();

    if data.is_empty() {
        None
    } else {
        Some(data.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_data_extracts_payload() {
        assert_eq!(
            frame_data(b"data: {\"content\":\"hi\"}\n").as_deref(),
            Some("{\"content\":\"hi\"}")
        );
        assert_eq!(frame_data(b"data: [DONE]\n").as_deref(), Some("[DONE]"));
    }

    #[test]
    fn frame_data_skips_non_data_lines() {
        assert!(frame_data(b"\n").is_none());
        assert!(frame_data(b"event: ping\n").is_none());
        assert!(frame_data(b"data:\n").is_none());
        assert!(frame_data(b": keep-alive\n").is_none());
    }

    #[test]
    fn chat_request_omits_absent_model() {
        let messages = vec![Message::user("hello")];
        let request = ChatRequest {
            messages: &messages,
            stream: true,
            model: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("model").is_none());
        assert_eq!(json["stream"], true);
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
