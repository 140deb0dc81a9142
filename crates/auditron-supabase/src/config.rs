//! Hosted backend client configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connect timeout.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the hosted auth/database backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct SupabaseConfig {
    /// Base URL of the hosted project, e.g. `https://xyz.supabase.co`.
    #[cfg_attr(feature = "config", arg(long = "supabase-url", env = "SUPABASE_URL"))]
    pub supabase_url: Url,

    /// Service role key used for server-side row access.
    #[cfg_attr(
        feature = "config",
        arg(long = "supabase-service-key", env = "SUPABASE_SERVICE_ROLE_KEY")
    )]
    pub supabase_service_key: String,

    /// Request timeout in seconds.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "supabase-timeout",
            env = "SUPABASE_TIMEOUT",
            default_value_t = DEFAULT_TIMEOUT_SECS,
        )
    )]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl SupabaseConfig {
    /// Creates a new configuration.
    pub fn new(supabase_url: Url, supabase_service_key: impl Into<String>) -> Self {
        Self {
            supabase_url,
            supabase_service_key: supabase_service_key.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Sets the request timeout in seconds.
    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
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
        let config = SupabaseConfig::new(
            Url::parse("https://xyz.supabase.co").unwrap(),
            "service-key",
        )
        .with_timeout_secs(5);

        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.supabase_service_key, "service-key");
    }
}
