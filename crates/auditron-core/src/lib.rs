#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for the main library.
pub const TRACING_TARGET: &str = "auditron_core";

pub mod types;

pub use crate::types::{
    AwsCredentials, AzureCredentials, CloudProvider, CredentialSet, CredentialsError,
    GcpCredentials, ReportDocument, ReportKind,
};
