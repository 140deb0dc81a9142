//! Audit tool catalog.
//!
//! The audit tools themselves run inside the external audit protocol
//! service and are invoked by the agent, never by this crate. What the relay
//! needs is the *catalog*: which tools exist per cloud provider, discovered
//! at startup and on explicit re-initialization.

mod discovery;

use auditron_core::CloudProvider;
pub use discovery::{RetryPolicy, ToolDiscovery};
use serde::{Deserialize, Serialize};

/// Document generation tools built into the agent preamble.
///
/// Always available, even when audit tool discovery fails.
const DOCUMENT_TOOLS: [&str; 3] = [
    "generate_soc_document",
    "generate_iso_document",
    "generate_compliance_report",
];

/// A single audit tool exposed by the audit protocol service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Stable tool identifier, e.g. `AWS-S3-PUBLIC-ACCESS-V1`.
    pub id: String,

    /// Human-readable description.
    pub description: String,
}

/// Tool listing as returned by the audit protocol service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolListing {
    /// Total number of tools.
    #[serde(default)]
    pub tool_count: usize,

    /// Tools grouped by provider.
    #[serde(default)]
    pub providers: ProviderListing,
}

/// Per-provider tool groups in a listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderListing {
    #[serde(default)]
    pub aws: Vec<ToolDescriptor>,
    #[serde(default)]
    pub azure: Vec<ToolDescriptor>,
    #[serde(default)]
    pub gcp: Vec<ToolDescriptor>,
}

/// The set of tools currently available to the agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCatalog {
    aws: Vec<ToolDescriptor>,
    azure: Vec<ToolDescriptor>,
    gcp: Vec<ToolDescriptor>,
    degraded: bool,
}

impl ToolCatalog {
    /// Returns the reduced capability set: document generation only.
    ///
    /// Used before the first discovery and as the fallback when discovery
    /// exhausts its retries.
    pub fn builtin() -> Self {
        Self {
            degraded: true,
            ..Self::default()
        }
    }

    /// Builds a full catalog from a discovery listing.
    pub fn from_listing(listing: ToolListing) -> Self {
        Self {
            aws: listing.providers.aws,
            azure: listing.providers.azure,
            gcp: listing.providers.gcp,
            degraded: false,
        }
    }

    /// Returns the audit tools for one provider.
    pub fn provider_tools(&self, provider: CloudProvider) -> &[ToolDescriptor] {
        match provider {
            CloudProvider::Aws => &self.aws,
            CloudProvider::Azure => &self.azure,
            CloudProvider::Gcp => &self.gcp,
        }
    }

    /// Returns the total number of discovered audit tools.
    pub fn audit_tool_count(&self) -> usize {
        self.aws.len() + self.azure.len() + self.gcp.len()
    }

    /// Returns the always-available document generation tool names.
    pub fn document_tools() -> &'static [&'static str] {
        &DOCUMENT_TOOLS
    }

    /// Returns true if this catalog is the reduced fallback set.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(id: &str) -> ToolDescriptor {
        ToolDescriptor {
            id: id.to_string(),
            description: format!("checks {id}"),
        }
    }

    #[test]
    fn builtin_catalog_is_degraded() {
        let catalog = ToolCatalog::builtin();

        assert!(catalog.is_degraded());
        assert_eq!(catalog.audit_tool_count(), 0);
        assert_eq!(ToolCatalog::document_tools().len(), 3);
    }

    #[test]
    fn listing_groups_by_provider() {
        let listing = ToolListing {
            tool_count: 3,
            providers: ProviderListing {
                aws: vec![
                    descriptor("AWS-S3-PUBLIC-ACCESS-V1"),
                    descriptor("AWS-RDS-PUBLIC-ACCESS-V1"),
                ],
                azure: vec![descriptor("AZURE-STORAGE-PUBLIC-ACCESS-V1")],
                gcp: vec![],
            },
        };

        let catalog = ToolCatalog::from_listing(listing);

        assert!(!catalog.is_degraded());
        assert_eq!(catalog.audit_tool_count(), 3);
        assert_eq!(catalog.provider_tools(CloudProvider::Aws).len(), 2);
        assert_eq!(catalog.provider_tools(CloudProvider::Gcp).len(), 0);
    }

    #[test]
    fn listing_tolerates_missing_groups() {
        let listing: ToolListing = serde_json::from_str(
            r#"{"tool_count": 1, "providers": {"aws": [{"id": "AWS-IAM-MFA-V1", "description": "MFA"}]}}"#,
        )
        .unwrap();

        let catalog = ToolCatalog::from_listing(listing);
        assert_eq!(catalog.audit_tool_count(), 1);
    }
}
