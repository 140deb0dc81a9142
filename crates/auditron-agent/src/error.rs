//! Error types for auditron-agent.

use std::fmt;

/// Result type alias for relay operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a conversation turn.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Provider error (agent API call failed, rate limited, etc.)
    #[error("provider error: {provider}: {message}")]
    Provider { provider: String, message: String },

    /// Session error.
    #[error("session error: {0}")]
    Session(String),

    /// Agent turn error.
    #[error("agent error: {0}")]
    Agent(String),

    /// Tool discovery error.
    #[error("tool error: {tool}: {message}")]
    Tool { tool: String, message: String },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The submitted message was empty or whitespace.
    ///
    /// Turn entry points reject these without emitting events or touching
    /// the session.
    #[error("message is empty")]
    EmptyMessage,

    /// A turn is already in flight for this session.
    ///
    /// Sessions run at most one turn at a time; a second submission is
    /// rejected rather than queued.
    #[error("a turn is already in progress for this session")]
    TurnInProgress,

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Transport error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Creates a provider error.
    pub fn provider(provider: impl fmt::Display, message: impl fmt::Display) -> Self {
        Self::Provider {
            provider: provider.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates a session error.
    pub fn session(message: impl fmt::Display) -> Self {
        Self::Session(message.to_string())
    }

    /// Creates an agent error.
    pub fn agent(message: impl fmt::Display) -> Self {
        Self::Agent(message.to_string())
    }

    /// Creates a tool error.
    pub fn tool(tool: impl fmt::Display, message: impl fmt::Display) -> Self {
        Self::Tool {
            tool: tool.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl fmt::Display) -> Self {
        Self::Config(message.to_string())
    }

    /// Returns true if this error is worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Provider { .. } | Self::Http(_))
    }
}
