//! Tool discovery with bounded retry.

use std::time::Duration;

use reqwest::{Client as HttpClient, ClientBuilder};
use url::Url;

use super::{ToolCatalog, ToolListing};
use crate::{Error, Result};

/// Tracing target for discovery operations.
const TRACING_TARGET: &str = "auditron_agent::tool";

/// Discovery request timeout.
const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Bounded retry with linear backoff.
///
/// Attempt `n` (1-based) is followed by a `n * backoff` sleep, so the waits
/// for the default policy are 500ms and 1s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,

    /// Base backoff added per failed attempt.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with explicit bounds.
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// Returns the sleep after the given 1-based attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff * attempt
    }
}

/// Discovers audit tools from the audit protocol service.
#[derive(Debug, Clone)]
pub struct ToolDiscovery {
    http_client: HttpClient,
    audit_url: Url,
    policy: RetryPolicy,
}

impl ToolDiscovery {
    /// Creates a discovery client for the given audit service.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created or the URL
    /// cannot address the tool listing endpoint.
    pub fn new(audit_url: Url, policy: RetryPolicy) -> Result<Self> {
        if audit_url.cannot_be_a_base() {
            return Err(Error::config("audit service URL cannot be a base"));
        }

        let http_client = ClientBuilder::new()
            .timeout(DISCOVERY_TIMEOUT)
            .user_agent(concat!("auditron/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            http_client,
            audit_url,
            policy,
        })
    }

    /// Returns the configured audit service URL.
    pub fn audit_url(&self) -> &Url {
        &self.audit_url
    }

    /// Fetches the tool listing, retrying per the policy.
    ///
    /// Never fails: when every attempt is exhausted the reduced built-in
    /// capability set is returned instead.
    pub async fn discover(&self) -> ToolCatalog {
        for attempt in 1..=self.policy.max_attempts {
            match self.fetch_listing().await {
                Ok(listing) => {
                    tracing::info!(
                        target: TRACING_TARGET,
                        attempt,
                        tool_count = listing.tool_count,
                        "Tool discovery succeeded"
                    );
                    return ToolCatalog::from_listing(listing);
                }
                Err(error) => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        error = %error,
                        "Tool discovery attempt failed"
                    );

                    if attempt < self.policy.max_attempts {
                        tokio::time::sleep(self.policy.delay_for(attempt)).await;
                    }
                }
            }
        }

        tracing::warn!(
            target: TRACING_TARGET,
            "Tool discovery exhausted, falling back to built-in tools"
        );
        ToolCatalog::builtin()
    }

    async fn fetch_listing(&self) -> Result<ToolListing> {
        let mut url = self.audit_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config("audit service URL cannot be a base"))?
            .pop_if_empty()
            .push("tools");

        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::tool(
                "discovery",
                format!("listing returned status {}", response.status().as_u16()),
            ));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_is_linear() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn exhausted_discovery_degrades() {
        // Nothing listens on a discard port; both attempts fail fast.
        let discovery = ToolDiscovery::new(
            Url::parse("http://127.0.0.1:9/mcp").unwrap(),
            RetryPolicy::new(2, Duration::from_millis(1)),
        )
        .unwrap();

        let catalog = discovery.discover().await;
        assert!(catalog.is_degraded());
        assert_eq!(catalog.audit_tool_count(), 0);
    }
}
