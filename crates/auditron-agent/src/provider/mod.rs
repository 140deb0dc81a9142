//! External agent client.
//!
//! The agent itself (model, tool execution, planning) is a hosted service;
//! this module only speaks its HTTP contract: submit a message list, consume
//! a stream of opaque chunks.

mod chunk;
mod client;
mod config;

pub use chunk::AgentChunk;
pub use client::{AgentChunkStream, AgentClient};
pub use config::AgentConfig;
