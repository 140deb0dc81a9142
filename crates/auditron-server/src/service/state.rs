//! Application state and dependency injection.

use auditron_agent::ChatService;
use auditron_supabase::SupabaseClient;

use crate::service::{RateLimiter, Result, ServiceConfig, SessionRegistry};

/// Tracing target for state initialization.
const TRACING_TARGET: &str = "auditron_server::service";

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    supabase: SupabaseClient,
    chat: ChatService,
    sessions: SessionRegistry,
    rate_limiter: RateLimiter,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Connects to the hosted backend and the agent, and runs the initial
    /// tool discovery (with its bounded retry) before serving traffic.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        let supabase = config.connect_supabase()?;
        let chat = config.create_chat_service()?;

        let catalog = chat.initialize().await;
        tracing::info!(
            target: TRACING_TARGET,
            audit_tools = catalog.audit_tool_count(),
            degraded = catalog.is_degraded(),
            "Service state initialized"
        );

        Ok(Self {
            supabase,
            chat,
            sessions: SessionRegistry::new(),
            rate_limiter: RateLimiter::new(),
        })
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+ $(,)?) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(supabase: SupabaseClient);
impl_di!(chat: ChatService);
impl_di!(sessions: SessionRegistry);
impl_di!(rate_limiter: RateLimiter);
