//! Identity lookup against the hosted auth service.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, SupabaseClient, TRACING_TARGET_AUTH};

/// An authenticated end user, as reported by the hosted auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Stable user ID.
    pub id: Uuid,

    /// Primary email address, if the account has one.
    #[serde(default)]
    pub email: Option<String>,
}

impl SupabaseClient {
    /// Resolves an access token to the user it belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] for missing, invalid or expired tokens, and
    /// [`Error::Http`]/[`Error::Api`] for transport or backend failures.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser> {
        if access_token.is_empty() {
            return Err(Error::auth("access token is empty"));
        }

        let response = self.user_request("user", access_token)?.send().await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::auth("invalid or expired access token"));
        }

        let response = Self::error_for_status(response).await?;
        let user: AuthUser = response.json().await?;

        tracing::debug!(
            target: TRACING_TARGET_AUTH,
            user_id = %user.id,
            "Resolved access token"
        );

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_deserializes_with_extra_fields() {
        // The auth service returns many more fields than we keep.
        let json = r#"{
            "id": "b52cbad1-81f6-425b-bd31-6b3047cdd761",
            "aud": "authenticated",
            "email": "user@example.com",
            "role": "authenticated",
            "app_metadata": {"provider": "email"}
        }"#;

        let user: AuthUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.email.as_deref(), Some("user@example.com"));
    }
}
