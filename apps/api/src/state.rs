use std::sync::Arc;

use crate::analysis::fallback::FallbackOrchestrator;
use crate::users::store::UserStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owns the generation adapter; constructed once in `main`.
    pub orchestrator: Arc<FallbackOrchestrator>,
    pub users: Arc<UserStore>,
    /// Body limit applied to the resume upload routes.
    pub max_upload_bytes: usize,
}
