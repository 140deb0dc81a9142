//! App [`state`] configuration.
//!
//! [`state`]: crate::service::ServiceState

use std::time::Duration;

use auditron_agent::{AgentClient, AgentConfig, ChatService, RetryPolicy, ToolDiscovery};
use auditron_supabase::{SupabaseClient, SupabaseConfig};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::service::{Error, Result};

/// App state configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(clap::Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Hosted auth/database backend.
    #[cfg_attr(feature = "config", clap(flatten))]
    #[serde(flatten)]
    pub supabase: SupabaseConfig,

    /// External agent endpoint.
    #[cfg_attr(feature = "config", clap(flatten))]
    #[serde(flatten)]
    pub agent: AgentConfig,

    /// Base URL of the audit protocol service used for tool discovery.
    ///
    /// When unset the agent runs with the built-in document tools only.
    #[cfg_attr(feature = "config", arg(long = "audit-url", env = "AUDIT_URL"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_url: Option<Url>,

    /// Tool discovery attempts before falling back to built-in tools.
    #[cfg_attr(
        feature = "config",
        arg(long = "audit-retry-attempts", env = "AUDIT_RETRY_ATTEMPTS", default_value_t = 3)
    )]
    #[serde(default = "default_retry_attempts")]
    pub audit_retry_attempts: u32,

    /// Base backoff between discovery attempts, in milliseconds.
    #[cfg_attr(
        feature = "config",
        arg(long = "audit-retry-backoff-ms", env = "AUDIT_RETRY_BACKOFF_MS", default_value_t = 500)
    )]
    #[serde(default = "default_retry_backoff_ms")]
    pub audit_retry_backoff_ms: u64,
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    500
}

impl ServiceConfig {
    /// Validates all configuration values and returns errors for invalid
    /// settings.
    pub fn validate(&self) -> Result<()> {
        if self.supabase.supabase_service_key.is_empty() {
            return Err(Error::config("Supabase service role key cannot be empty"));
        }

        if self.audit_retry_attempts == 0 {
            return Err(Error::config(
                "Audit tool discovery needs at least one attempt",
            ));
        }

        Ok(())
    }

    /// Creates the hosted backend client.
    pub fn connect_supabase(&self) -> Result<SupabaseClient> {
        SupabaseClient::new(self.supabase.clone()).map_err(Into::into)
    }

    /// Creates the chat service, wiring tool discovery when an audit service
    /// is configured.
    pub fn create_chat_service(&self) -> Result<ChatService> {
        let agent = AgentClient::new(self.agent.clone())?;

        let Some(audit_url) = &self.audit_url else {
            return Ok(ChatService::new(agent));
        };

        let policy = RetryPolicy::new(
            self.audit_retry_attempts,
            Duration::from_millis(self.audit_retry_backoff_ms),
        );
        let discovery = ToolDiscovery::new(audit_url.clone(), policy)?;

        Ok(ChatService::with_discovery(agent, discovery))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServiceConfig {
        ServiceConfig {
            supabase: SupabaseConfig::new(
                Url::parse("https://xyz.supabase.co").unwrap(),
                "service-key",
            ),
            agent: AgentConfig::new(Url::parse("http://127.0.0.1:8123/v1/chat").unwrap()),
            audit_url: None,
            audit_retry_attempts: 3,
            audit_retry_backoff_ms: 500,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let mut config = config();
        config.audit_retry_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn chat_service_without_audit_url_is_builtin_only() {
        let service = config().create_chat_service().unwrap();
        assert!(service.tools().await.is_degraded());
    }
}
