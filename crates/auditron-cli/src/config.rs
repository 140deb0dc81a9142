//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── server: ServerConfig    # Host, port, timeouts, CORS origins
//! └── service: ServiceConfig  # Hosted backend, agent, audit service
//! ```
//!
//! All configuration can be provided via CLI arguments or environment
//! variables. Use `--help` to see all available options.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::{Result as AnyhowResult, anyhow};
use auditron_server::service::ServiceConfig;
use clap::{Args, Parser};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "auditron")]
#[command(about = "Auditron compliance assistant server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// External service configuration (hosted backend, agent, audit tools).
    #[clap(flatten)]
    pub service: ServiceConfig,
}

impl Cli {
    /// Loads environment variables from a .env file and parses CLI
    /// arguments.
    ///
    /// The .env file is loaded first so that clap's `env` attributes can
    /// pick up values from it.
    pub fn init() -> Self {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }

        Self::parse()
    }

    /// Initializes tracing with environment-based filtering.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// HTTP server configuration.
///
/// # Environment Variables
///
/// - `HOST` - Server host address (default: 127.0.0.1)
/// - `PORT` - Server port (default: 3000, valid range: 1024-65535)
/// - `REQUEST_TIMEOUT` - Request processing timeout in seconds (default: 30)
/// - `SHUTDOWN_TIMEOUT` - Graceful shutdown timeout in seconds (default: 30)
/// - `CORS_ALLOWED_ORIGINS` - Comma-separated list of allowed CORS origins
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct ServerConfig {
    /// Host address to bind the server to.
    ///
    /// Use "127.0.0.1" for localhost only, "0.0.0.0" for all interfaces.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// TCP port number for the server to listen on.
    ///
    /// Must be in the range 1024-65535; ports below 1024 require root
    /// privileges.
    #[arg(short = 'p', long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Maximum time in seconds to wait for a request to complete.
    ///
    /// Bounds time-to-first-response only; established event streams are
    /// not cut off.
    #[arg(long, env = "REQUEST_TIMEOUT", default_value_t = 30)]
    pub request_timeout: u64,

    /// Maximum time in seconds to wait for graceful shutdown.
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 30)]
    pub shutdown_timeout: u64,

    /// List of allowed CORS origins.
    ///
    /// If empty, a permissive policy is used for development.
    #[arg(long, env = "CORS_ALLOWED_ORIGINS", value_delimiter = ',')]
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

/// Default host address for development.
fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

impl ServerConfig {
    /// Validates all configuration values and returns errors for invalid
    /// settings.
    pub fn validate(&self) -> AnyhowResult<()> {
        if self.port < 1024 {
            return Err(anyhow!(
                "Port {} is below 1024. Use ports 1024-65535 to avoid requiring root privileges.",
                self.port
            ));
        }

        if self.request_timeout == 0 || self.request_timeout > 300 {
            return Err(anyhow!(
                "Request timeout {} seconds is invalid. Must be between 1 and 300 seconds.",
                self.request_timeout
            ));
        }

        if self.shutdown_timeout == 0 || self.shutdown_timeout > 300 {
            return Err(anyhow!(
                "Shutdown timeout {} seconds is invalid. Must be between 1 and 300 seconds.",
                self.shutdown_timeout
            ));
        }

        Ok(())
    }

    /// Returns the socket address to bind.
    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns true when bound to all interfaces.
    pub fn binds_to_all_interfaces(&self) -> bool {
        self.host.is_unspecified()
    }

    /// Returns the request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Returns the graceful shutdown timeout.
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            host: default_host(),
            port: 3000,
            request_timeout: 30,
            shutdown_timeout: 30,
            cors_allowed_origins: Vec::new(),
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(config().validate().is_ok());
        assert_eq!(config().server_addr().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn privileged_ports_are_rejected() {
        let mut config = config();
        config.port = 80;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = config();
        config.request_timeout = 0;
        assert!(config.validate().is_err());
    }
}
