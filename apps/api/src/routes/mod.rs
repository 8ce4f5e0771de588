pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::state::AppState;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    // Uploads only; JSON routes keep axum's default limit.
    let upload_limit = state.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/api/signup", post(users::handle_signup))
        .route("/api/login", post(users::handle_login))
        .route(
            "/api/progress/:uid",
            get(users::handle_get_progress).post(users::handle_update_progress),
        )
        // AI
        .route(
            "/api/resume-analyze",
            post(analysis::handle_resume_analyze).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/analyze-resume",
            post(analysis::handle_resume_analyze).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/chat", post(analysis::handle_chat))
        .route("/chat", post(analysis::handle_chat))
        .with_state(state)
}
