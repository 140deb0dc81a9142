//! Agent client configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

/// Default connect timeout.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the external agent endpoint.
///
/// Note that there is no overall request timeout: turn streams stay open for
/// as long as the agent keeps producing chunks, and the relay relies on the
/// transport failing or the client abandoning the stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct AgentConfig {
    /// Chat endpoint of the hosted agent.
    #[cfg_attr(feature = "config", arg(long = "agent-url", env = "AGENT_URL"))]
    pub agent_url: Url,

    /// API key sent as a bearer token, if the agent requires one.
    #[cfg_attr(feature = "config", arg(long = "agent-api-key", env = "AGENT_API_KEY"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_api_key: Option<String>,

    /// Model override forwarded with each request.
    #[cfg_attr(feature = "config", arg(long = "agent-model", env = "AGENT_MODEL"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_model: Option<String>,
}

impl AgentConfig {
    /// Creates a new configuration for an agent endpoint.
    pub fn new(agent_url: Url) -> Self {
        Self {
            agent_url,
            agent_api_key: None,
            agent_model: None,
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.agent_api_key = Some(api_key.into());
        self
    }

    /// Sets the model override.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.agent_model = Some(model.into());
        self
    }

    /// Returns the connect timeout.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_pattern() {
        let config = AgentConfig::new(Url::parse("http://localhost:8123/v1/chat").unwrap())
            .with_api_key("key")
            .with_model("gemini-2.5-flash");

        assert_eq!(config.agent_api_key.as_deref(), Some("key"));
        assert_eq!(config.agent_model.as_deref(), Some("gemini-2.5-flash"));
    }
}
