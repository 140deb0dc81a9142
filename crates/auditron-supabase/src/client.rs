//! Hosted backend client implementation.
//!
//! The client wraps the backend's two HTTP interfaces: the REST interface for
//! row access (`/rest/v1/{table}`) and the auth interface for identity lookup
//! (`/auth/v1/user`). Row access always uses the service role key; identity
//! lookup forwards the end user's bearer token.

use reqwest::{Client as HttpClient, ClientBuilder, Method, RequestBuilder};
use url::Url;

use crate::{Error, Result, SupabaseConfig, TRACING_TARGET_CLIENT};

/// Client for the hosted auth/database backend.
///
/// This type is cheap to clone and can be shared across threads.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http_client: HttpClient,
    config: SupabaseConfig,
}

impl SupabaseClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created or if the
    /// configured service key is empty.
    pub fn new(config: SupabaseConfig) -> Result<Self> {
        if config.supabase_service_key.is_empty() {
            return Err(Error::invalid_config("service role key cannot be empty"));
        }

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            base_url = %config.supabase_url,
            "Creating hosted backend client"
        );

        let http_client = ClientBuilder::new()
            .timeout(config.timeout())
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
    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    /// Builds a URL for a REST table endpoint.
    pub(crate) fn rest_url(&self, table: &str) -> Result<Url> {
        self.config
            .supabase_url
            .join(&format!("/rest/v1/{table}"))
            .map_err(|e| Error::invalid_config(format!("invalid table URL: {e}")))
    }

    /// Builds a URL for an auth endpoint.
    pub(crate) fn auth_url(&self, path: &str) -> Result<Url> {
        self.config
            .supabase_url
            .join(&format!("/auth/v1/{path}"))
            .map_err(|e| Error::invalid_config(format!("invalid auth URL: {e}")))
    }

    /// Creates a REST request authenticated with the service role key.
    pub(crate) fn rest_request(&self, method: Method, table: &str) -> Result<RequestBuilder> {
        let url = self.rest_url(table)?;
        let request = self
            .http_client
            .request(method, url)
            .header("apikey", &self.config.supabase_service_key)
            .bearer_auth(&self.config.supabase_service_key);

        Ok(request)
    }

    /// Creates an auth request carrying an end user's access token.
    pub(crate) fn user_request(&self, path: &str, access_token: &str) -> Result<RequestBuilder> {
        let url = self.auth_url(path)?;
        let request = self
            .http_client
            .request(Method::GET, url)
            .header("apikey", &self.config.supabase_service_key)
            .bearer_auth(access_token);

        Ok(request)
    }

    /// Converts a non-success response into an [`Error::Api`].
    pub(crate) async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());

        tracing::warn!(
            target: TRACING_TARGET_CLIENT,
            status,
            message,
            "Backend request failed"
        );

        Err(Error::api(status, message))
    }
}
