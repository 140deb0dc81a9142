//! Credential response types.

use auditron_core::CredentialSet;
use schemars::JsonSchema;
use serde::Serialize;

/// Stored credentials for the authenticated user.
///
/// Users that never saved credentials get the empty set, not a 404.
#[must_use]
#[derive(Debug, Serialize, JsonSchema)]
pub struct CredentialsResponse {
    /// Per-provider credential payloads.
    pub credentials: CredentialSet,
}

/// Result of saving credentials.
#[must_use]
#[derive(Debug, Serialize, JsonSchema)]
pub struct SaveCredentialsResponse {
    /// Always true; failures use an error response instead.
    pub success: bool,

    /// The credential set as stored after the merge.
    pub credentials: CredentialSet,
}
