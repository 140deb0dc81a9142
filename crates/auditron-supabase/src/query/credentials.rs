//! Credential repository for per-user cloud provider credentials.

use std::future::Future;

use auditron_core::CredentialSet;
use jiff::Timestamp;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, SupabaseClient, TRACING_TARGET_CLIENT};

/// Table holding one credential row per user.
const TABLE: &str = "credentials";

/// A credential row as stored in the hosted database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRow {
    /// Owning user.
    pub user_id: Uuid,

    /// Per-provider credential payloads.
    #[serde(flatten)]
    pub credentials: CredentialSet,

    /// Last modification time, set by the database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

/// Repository for credential row operations.
pub trait CredentialsRepository {
    /// Finds the credential row for a user.
    ///
    /// Returns `None` if the user has never saved credentials.
    fn find_credentials(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Option<CredentialRow>>> + Send;

    /// Inserts or merges the credential row for a user.
    ///
    /// Providers absent from `credentials` are left untouched on merge.
    fn upsert_credentials(
        &self,
        user_id: Uuid,
        credentials: CredentialSet,
    ) -> impl Future<Output = Result<CredentialRow>> + Send;

    /// Deletes the credential row for a user.
    fn delete_credentials(&self, user_id: Uuid) -> impl Future<Output = Result<()>> + Send;
}

impl CredentialsRepository for SupabaseClient {
    async fn find_credentials(&self, user_id: Uuid) -> Result<Option<CredentialRow>> {
        let response = self
            .rest_request(Method::GET, TABLE)?
            .query(&[("user_id", format!("eq.{user_id}")), ("limit", "1".into())])
            .send()
            .await?;

        let response = Self::error_for_status(response).await?;
        let mut rows: Vec<CredentialRow> = response.json().await?;

        Ok(rows.pop())
    }

    async fn upsert_credentials(
        &self,
        user_id: Uuid,
        credentials: CredentialSet,
    ) -> Result<CredentialRow> {
        let row = CredentialRow {
            user_id,
            credentials,
            updated_at: None,
        };

        let response = self
            .rest_request(Method::POST, TABLE)?
            .query(&[("on_conflict", "user_id")])
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&row)
            .send()
            .await?;

        let response = Self::error_for_status(response).await?;
        let mut rows: Vec<CredentialRow> = response.json().await?;

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            %user_id,
            "Credential row upserted"
        );

        rows.pop()
            .ok_or_else(|| crate::Error::api(500, "upsert returned no representation"))
    }

    async fn delete_credentials(&self, user_id: Uuid) -> Result<()> {
        let response = self
            .rest_request(Method::DELETE, TABLE)?
            .query(&[("user_id", format!("eq.{user_id}"))])
            .send()
            .await?;

        Self::error_for_status(response).await?;

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            %user_id,
            "Credential row deleted"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_flattens_credential_set() {
        let row = CredentialRow {
            user_id: Uuid::nil(),
            credentials: CredentialSet::default(),
            updated_at: None,
        };

        let json = serde_json::to_value(&row).unwrap();
        // Provider payloads are columns of the row, not a nested object.
        assert!(json.get("credentials").is_none());
        assert!(json.as_object().unwrap().contains_key("aws_credentials"));
    }
}
