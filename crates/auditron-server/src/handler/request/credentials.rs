//! Credential request types.

use auditron_core::{AwsCredentials, AzureCredentials, CredentialSet, GcpCredentials};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for saving cloud provider credentials.
///
/// Providers left out of the payload are not touched; field-presence checks
/// for the supplied payloads run in the handler via
/// [`CredentialSet::validate`].
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
pub struct UpsertCredentials {
    /// AWS access keys.
    pub aws_credentials: Option<AwsCredentials>,

    /// Azure service principal.
    pub azure_credentials: Option<AzureCredentials>,

    /// GCP service account key.
    pub gcp_credentials: Option<GcpCredentials>,
}

impl UpsertCredentials {
    /// Converts this request into the stored credential set.
    pub fn into_credential_set(self) -> CredentialSet {
        CredentialSet {
            aws_credentials: self.aws_credentials,
            azure_credentials: self.azure_credentials,
            gcp_credentials: self.gcp_credentials,
        }
    }
}
