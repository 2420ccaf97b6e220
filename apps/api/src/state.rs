use std::sync::Arc;

use sqlx::PgPool;

use crate::llm_client::LlmGateway;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Gateway for all Gemini calls. Trait object so handlers and pipeline
    /// stages can be driven by a substitute in tests.
    pub llm: Arc<dyn LlmGateway>,
}
