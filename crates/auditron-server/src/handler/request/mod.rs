//! Request payload types.

mod chat;
mod credentials;

pub use chat::{ChatAction, ChatQuery, SendChatMessage};
pub use credentials::UpsertCredentials;
