//! Axum route handlers for resume analysis and chat.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::extract::extract_resume_text;
use crate::analysis::models::{AnalysisResult, GenerationRequest};
use crate::analysis::normalizer::extract_json_object;
use crate::analysis::synthesis::synthesize;
use crate::errors::AppError;
use crate::llm_client::prompts::resume_analysis_prompt;
use crate::state::AppState;

/// Multipart field carrying the uploaded resume.
const RESUME_FIELD: &str = "resume";

pub const EMPTY_MESSAGE_REPLY: &str = "Please enter a message.";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /api/resume-analyze (alias /analyze-resume)
///
/// Upload validation failures are 400s. Once text is in hand the response is
/// always a complete `AnalysisResult`: model output that cannot be parsed is
/// replaced with the synthesized analysis.
pub async fn handle_resume_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let data = read_resume_field(multipart, state.max_upload_bytes).await?;

    let resume_text = extract_resume_text(data).await;
    if resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Failed to extract text from PDF. Ensure it's not a scanned image or empty."
                .to_string(),
        ));
    }

    let request =
        GenerationRequest::resume_analysis(resume_analysis_prompt(&resume_text), resume_text);
    let generation = state.orchestrator.run(&request).await;

    let analysis = match extract_json_object(&generation.text) {
        Ok(obj) => AnalysisResult::from_object(&obj),
        Err(e) => {
            warn!("Model output unusable, synthesizing analysis: {e}");
            synthesize(request.source_text())
        }
    };

    info!(
        "Resume analyzed: score={}, synthesized={}, failed_attempts={}",
        analysis.score,
        generation.was_synthesized,
        generation.attempts.iter().filter(|a| !a.succeeded()).count()
    );
    Ok(Json(analysis))
}

/// Pulls the non-empty `resume` file out of the form.
async fn read_resume_field(mut multipart: Multipart, limit: usize) -> Result<Bytes, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Invalid multipart body", limit))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }

        if field.file_name().is_some_and(|name| name.trim().is_empty()) {
            return Err(AppError::Validation("No selected file".to_string()));
        }
        let filename = field.file_name().unwrap_or("resume").to_string();

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, "Invalid file upload", limit))?;

        info!("Received file: {filename}, size: {} bytes", data.len());
        if data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }
        return Ok(data);
    }

    Err(AppError::Validation("No resume file uploaded".to_string()))
}

/// The body limit surfaces as a multipart read error; report it as 413.
fn multipart_error(err: MultipartError, context: &str, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Resume upload rejected: body exceeds {limit} bytes");
        return AppError::PayloadTooLarge(format!(
            "File too large. Resumes are limited to {} MB.",
            limit / (1024 * 1024)
        ));
    }
    AppError::Validation(format!("{context}: {err}"))
}

/// POST /api/chat (alias /chat)
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatResponse> {
    if req.message.trim().is_empty() {
        return Json(ChatResponse {
            reply: EMPTY_MESSAGE_REPLY.to_string(),
        });
    }

    let generation = state
        .orchestrator
        .run(&GenerationRequest::chat(req.message))
        .await;

    if generation.was_synthesized {
        warn!(
            "Chat answered with the offline reply. Last error: {}",
            generation.last_error().unwrap_or("no candidate models")
        );
    }
    Json(ChatResponse {
        reply: generation.text,
    })
}
