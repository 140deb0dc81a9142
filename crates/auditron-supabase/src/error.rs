//! Error types for auditron-supabase.

use thiserror::Error;

/// Result type alias for hosted backend operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the hosted auth/database client.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level HTTP failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the backend.
    #[error("api error: status {status}: {message}")]
    Api { status: u16, message: String },

    /// Identity lookup failure (missing, invalid or expired token).
    #[error("auth error: {0}")]
    Auth(String),

    /// Response body did not match the expected shape.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration errors.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Creates an API error from a status code and body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates an auth error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Creates a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
