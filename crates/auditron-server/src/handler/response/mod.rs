//! Response payload types.

mod chat;
mod credentials;
mod error_response;

pub use chat::{ChatHistory, ChatReply, DocumentData, InitResponse};
pub use credentials::{CredentialsResponse, SaveCredentialsResponse};
pub use error_response::ErrorResponse;
use schemars::JsonSchema;
use serde::Serialize;

/// Generic success acknowledgement.
#[must_use]
#[derive(Debug, Clone, Copy, Serialize, JsonSchema)]
pub struct Ack {
    /// Always true; failures use [`ErrorResponse`] instead.
    pub success: bool,
}

impl Ack {
    /// Creates a success acknowledgement.
    pub fn ok() -> Self {
        Self { success: true }
    }
}
