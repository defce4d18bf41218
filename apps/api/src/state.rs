use std::sync::Arc;

use crate::matching::engine::MatchEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Stateless match engine over the Postgres-backed competency store.
    pub engine: Arc<MatchEngine>,
}
