//! Request extractors.

mod auth;
mod validated_json;

pub use auth::{AuthState, MaybeAuthState};
pub use validated_json::ValidateJson;
