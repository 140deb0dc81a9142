#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for the main library.
pub const TRACING_TARGET: &str = "auditron_supabase";

/// Tracing target for client operations.
pub const TRACING_TARGET_CLIENT: &str = "auditron_supabase::client";

/// Tracing target for auth operations.
pub const TRACING_TARGET_AUTH: &str = "auditron_supabase::auth";

mod auth;
mod client;
mod config;
mod error;
pub mod query;

pub use crate::auth::AuthUser;
pub use crate::client::SupabaseClient;
pub use crate::config::SupabaseConfig;
pub use crate::error::{Error, Result};
