//! Cloud provider credential payloads.
//!
//! Credentials are stored as opaque per-provider JSON blobs in the hosted
//! backend; these types define the fields each provider requires and the
//! field-presence checks applied before a payload is accepted.

use serde::{Deserialize, Serialize};

/// Cloud provider supported by the audit tooling.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub enum CloudProvider {
    /// Amazon Web Services.
    Aws,
    /// Microsoft Azure.
    Azure,
    /// Google Cloud Platform.
    Gcp,
}

/// Error returned when a credential payload is missing required fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {provider} credentials: missing {field}")]
pub struct CredentialsError {
    /// Provider whose payload failed validation.
    pub provider: CloudProvider,
    /// First missing field.
    pub field: &'static str,
}

impl CredentialsError {
    fn missing(provider: CloudProvider, field: &'static str) -> Self {
        Self { provider, field }
    }
}

/// AWS access key credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct AwsCredentials {
    /// IAM access key ID.
    pub access_key_id: String,

    /// IAM secret access key.
    pub secret_access_key: String,

    /// Default region for audit calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl AwsCredentials {
    /// Checks that all required fields are present and non-empty.
    pub fn validate(&self) -> Result<(), CredentialsError> {
        if self.access_key_id.is_empty() {
            return Err(CredentialsError::missing(
                CloudProvider::Aws,
                "access_key_id",
            ));
        }
        if self.secret_access_key.is_empty() {
            return Err(CredentialsError::missing(
                CloudProvider::Aws,
                "secret_access_key",
            ));
        }
        Ok(())
    }
}

/// Azure service principal credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct AzureCredentials {
    /// Directory (tenant) ID.
    pub tenant_id: String,

    /// Application (client) ID.
    pub client_id: String,

    /// Client secret value.
    pub client_secret: String,

    /// Subscription to audit.
    pub subscription_id: String,
}

impl AzureCredentials {
    /// Checks that all required fields are present and non-empty.
    pub fn validate(&self) -> Result<(), CredentialsError> {
        for (field, value) in [
            ("tenant_id", &self.tenant_id),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("subscription_id", &self.subscription_id),
        ] {
            if value.is_empty() {
                return Err(CredentialsError::missing(CloudProvider::Azure, field));
            }
        }
        Ok(())
    }
}

/// GCP service account key.
///
/// Only the discriminating fields are modeled; the remainder of the service
/// account JSON is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct GcpCredentials {
    /// Key type, e.g. `service_account`.
    #[serde(rename = "type")]
    pub key_type: String,

    /// Project to audit.
    pub project_id: String,

    /// Private key material in PEM format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,

    /// Service account email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
}

impl GcpCredentials {
    /// Checks that all required fields are present and non-empty.
    pub fn validate(&self) -> Result<(), CredentialsError> {
        if self.key_type.is_empty() {
            return Err(CredentialsError::missing(CloudProvider::Gcp, "type"));
        }
        if self.project_id.is_empty() {
            return Err(CredentialsError::missing(CloudProvider::Gcp, "project_id"));
        }
        Ok(())
    }
}

/// Per-user credential set, one optional payload per provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct CredentialSet {
    /// AWS credentials, if configured.
    pub aws_credentials: Option<AwsCredentials>,

    /// Azure credentials, if configured.
    pub azure_credentials: Option<AzureCredentials>,

    /// GCP credentials, if configured.
    pub gcp_credentials: Option<GcpCredentials>,
}

impl CredentialSet {
    /// Returns true if at least one provider is configured.
    pub fn has_any(&self) -> bool {
        self.aws_credentials.is_some()
            || self.azure_credentials.is_some()
            || self.gcp_credentials.is_some()
    }

    /// Returns true if no provider is configured.
    pub fn is_empty(&self) -> bool {
        !self.has_any()
    }

    /// Returns the providers that are configured.
    pub fn providers(&self) -> Vec<CloudProvider> {
        [
            self.aws_credentials.as_ref().map(|_| CloudProvider::Aws),
            self.azure_credentials
                .as_ref()
                .map(|_| CloudProvider::Azure),
            self.gcp_credentials.as_ref().map(|_| CloudProvider::Gcp),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Validates every configured payload.
    ///
    /// Absent providers are skipped; the first invalid payload fails the set.
    pub fn validate(&self) -> Result<(), CredentialsError> {
        if let Some(aws) = &self.aws_credentials {
            aws.validate()?;
        }
        if let Some(azure) = &self.azure_credentials {
            azure.validate()?;
        }
        if let Some(gcp) = &self.gcp_credentials {
            gcp.validate()?;
        }
        Ok(())
    }
}
