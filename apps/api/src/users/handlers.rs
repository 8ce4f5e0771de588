use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;
use crate::users::store::PublicUser;

/// Both fields optional so that a missing one is a 400, not an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl CredentialsRequest {
    fn parts(&self) -> (&str, &str) {
        (
            self.email.as_deref().unwrap_or_default(),
            self.password.as_deref().unwrap_or_default(),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct ProgressUpdateResponse {
    pub message: &'static str,
    pub progress: Value,
}

/// POST /api/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let (email, password) = req.parts();
    let user = state.users.signup(email, password).await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully",
            user,
        }),
    ))
}

/// POST /api/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let (email, password) = req.parts();
    info!("Login attempt: {email}");
    let user = state.users.login(email, password).await?;
    info!("Login succeeded for {}", user.uid);
    Ok(Json(AuthResponse {
        message: "Login successful",
        user,
    }))
}

/// GET /api/progress/:uid
pub async fn handle_get_progress(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.users.progress(&uid).await?))
}

/// POST /api/progress/:uid
pub async fn handle_update_progress(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(progress): Json<Value>,
) -> Result<Json<ProgressUpdateResponse>, AppError> {
    let progress = state.users.update_progress(&uid, progress).await?;
    Ok(Json(ProgressUpdateResponse {
        message: "Progress updated",
        progress,
    }))
}
