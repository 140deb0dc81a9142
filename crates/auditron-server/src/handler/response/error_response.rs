//! HTTP error response representation.

use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use schemars::JsonSchema;
use serde::Serialize;

/// HTTP error response body.
///
/// Carries the error name, a user-friendly message safe for client display,
/// and optional resource/context information set by the handler.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ErrorResponse<'a> {
    /// The error name/type identifier
    pub name: Cow<'a, str>,
    /// User-friendly error message safe for client display
    pub message: Cow<'a, str>,
    /// The resource that the error relates to (optional, set by handler)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Cow<'a, str>>,
    /// Additional context for debugging (optional, set by handler)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Cow<'a, str>>,
    /// HTTP status code (not serialized in JSON)
    #[serde(skip)]
    #[schemars(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const BAD_REQUEST: Self = Self::new(
        "bad_request",
        "The request could not be processed due to invalid data",
        StatusCode::BAD_REQUEST,
    );
    pub const CONFLICT: Self = Self::new(
        "conflict",
        "The request conflicts with the current state of the resource",
        StatusCode::CONFLICT,
    );
    pub const FORBIDDEN: Self = Self::new(
        "forbidden",
        "You don't have permission to access this resource",
        StatusCode::FORBIDDEN,
    );
    // 5xx Server Errors
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal_server_error",
        "An internal server error occurred. Please try again later",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const MISSING_AUTH_TOKEN: Self = Self::new(
        "missing_auth_token",
        "Authentication is required to access this resource",
        StatusCode::UNAUTHORIZED,
    );
    pub const NOT_FOUND: Self = Self::new(
        "not_found",
        "The requested resource was not found",
        StatusCode::NOT_FOUND,
    );
    pub const TOO_MANY_REQUESTS: Self = Self::new(
        "too_many_requests",
        "Too many requests. Please slow down and try again later",
        StatusCode::TOO_MANY_REQUESTS,
    );
    pub const UNAUTHORIZED: Self = Self::new(
        "unauthorized",
        "The provided credentials are invalid or expired",
        StatusCode::UNAUTHORIZED,
    );

    /// Creates a new [`ErrorResponse`].
    const fn new(name: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            name: Cow::Borrowed(name),
            message: Cow::Borrowed(message),
            resource: None,
            context: None,
            status,
        }
    }

    /// Replaces the user-facing message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Sets the related resource.
    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Sets the debugging context.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl IntoResponse for ErrorResponse<'_> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted() {
        let json = serde_json::to_value(&ErrorResponse::NOT_FOUND).unwrap();

        assert_eq!(json["name"], "not_found");
        assert!(json.get("resource").is_none());
        assert!(json.get("context").is_none());
        assert!(json.get("status").is_none());
    }

    #[test]
    fn builder_overrides() {
        let response = ErrorResponse::BAD_REQUEST
            .with_message("Message is required and must be a string")
            .with_resource("chat");

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.message, "Message is required and must be a string");
        assert_eq!(response.resource.as_deref(), Some("chat"));
    }
}
