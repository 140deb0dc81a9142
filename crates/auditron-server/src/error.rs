//! Service layer error types and utilities.
//!
//! This module provides error handling for the service layer with:
//!
//! - Strongly-typed error kinds for different failure categories
//! - Builder pattern for ergonomic error construction
//! - Type-safe error source tracking with boxed trait objects

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

/// Type alias for boxed errors that are Send + Sync.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Result type alias for service layer operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error kind enumeration for categorizing service layer errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Configuration-related errors.
    Config,
    /// External service communication errors.
    External,
    /// Authentication and authorization errors.
    Auth,
    /// Internal service logic errors.
    Internal,
}

impl ErrorKind {
    /// Returns the error kind as a string for categorization.
    ///
    /// Useful for metrics, logging, or error categorization.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::External => "external_service",
            Self::Auth => "auth",
            Self::Internal => "internal_service",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service layer error with structured information.
#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct Error {
    /// The error category/type
    kind: ErrorKind,
    /// Human-readable error message
    message: Cow<'static, str>,
    /// Optional underlying error that caused this error
    #[source]
    source: Option<BoxedError>,
}

impl Error {
    /// Creates a new [`Error`].
    #[inline]
    fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches a source error to this error, enabling error chain tracking.
    #[inline]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error kind.
    #[must_use]
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[must_use]
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Creates a new configuration error.
    #[inline]
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Creates a new external service error.
    #[inline]
    pub fn external(
        service: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        let service_name = service.into();
        let msg = message.into();
        let full_message = format!("{}: {}", service_name, msg);
        Self::new(ErrorKind::External, full_message)
    }

    /// Creates a new authentication error.
    #[inline]
    pub fn auth(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Auth, message)
    }

    /// Creates a new internal service error.
    #[inline]
    pub fn internal(
        service: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        let service_name = service.into();
        let msg = message.into();
        let full_message = format!("{}: {}", service_name, msg);
        Self::new(ErrorKind::Internal, full_message)
    }
}

impl From<auditron_supabase::Error> for Error {
    fn from(err: auditron_supabase::Error) -> Self {
        Error::external("supabase", err.to_string()).with_source(err)
    }
}

impl From<auditron_agent::Error> for Error {
    fn from(err: auditron_agent::Error) -> Self {
        Error::external("agent", err.to_string()).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = Error::config("invalid configuration");
        assert_eq!(error.kind(), ErrorKind::Config);
        assert_eq!(error.message(), "invalid configuration");
    }

    #[test]
    fn test_error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::config("cannot read config file").with_source(source);

        assert!(StdError::source(&error).is_some());
        assert_eq!(error.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_external_service_error() {
        let error = Error::external("supabase", "Connection refused");

        assert_eq!(error.kind(), ErrorKind::External);
        assert!(error.to_string().contains("supabase"));
        assert!(error.to_string().contains("Connection refused"));
    }

    #[test]
    fn test_error_kind_as_str() {
        assert_eq!(ErrorKind::Config.as_str(), "config");
        assert_eq!(ErrorKind::External.as_str(), "external_service");
        assert_eq!(ErrorKind::Auth.as_str(), "auth");
        assert_eq!(ErrorKind::Internal.as_str(), "internal_service");
    }
}
