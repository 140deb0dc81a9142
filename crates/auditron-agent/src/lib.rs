#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod chat;
mod error;
pub mod provider;
pub mod session;
pub mod tool;

pub use crate::chat::{ChatEvent, ChatService, ChatStream};
pub use crate::error::{Error, Result};
pub use crate::provider::{AgentChunk, AgentClient, AgentConfig};
pub use crate::session::{ConversationSession, Message, MessageRole, SessionHandle};
pub use crate::tool::{RetryPolicy, ToolCatalog, ToolDescriptor, ToolDiscovery};

/// Tracing target for the main library.
pub const TRACING_TARGET: &str = "auditron_agent";
