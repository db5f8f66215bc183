use std::sync::Arc;

use crate::llm_client::AiGateway;
use crate::wizard::store::SessionStore;

/// Shared application state injected into all route handlers via Axum
/// extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable gateway collaborator. Production: `GeminiClient`; tests
    /// substitute stubs.
    pub gateway: Arc<dyn AiGateway>,
    /// In-memory wizard sessions — nothing survives the process.
    pub sessions: SessionStore,
}
