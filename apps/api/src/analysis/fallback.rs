//! Fallback Orchestrator — walks the candidate models in priority order.
//!
//! Single pass: each model is tried at most once, with no backoff. The first
//! non-empty success wins. When every candidate fails the answer is
//! synthesized locally, so `generate` never returns an error.

use std::sync::Arc;

use tracing::{info, warn};

use crate::analysis::models::{
    AttemptOutcome, Generation, GenerationKind, GenerationRequest, ModelAttempt,
};
use crate::analysis::synthesis::{synthesize, CHAT_FALLBACK_REPLY};
use crate::llm_client::{GenerationAdapter, LlmError};

pub struct FallbackOrchestrator {
    adapter: Arc<dyn GenerationAdapter>,
    candidate_models: Vec<String>,
}

impl FallbackOrchestrator {
    pub fn new(adapter: Arc<dyn GenerationAdapter>, candidate_models: Vec<String>) -> Self {
        Self {
            adapter,
            candidate_models,
        }
    }

    pub fn candidate_models(&self) -> &[String] {
        &self.candidate_models
    }

    /// Runs the chain over the configured candidates.
    pub async fn run(&self, request: &GenerationRequest) -> Generation {
        self.generate(request, &self.candidate_models).await
    }

    pub async fn generate(&self, request: &GenerationRequest, candidates: &[String]) -> Generation {
        let mut attempts = Vec::with_capacity(candidates.len());

        for model in candidates {
            info!("Attempting {:?} with model: {model}", request.kind());

            let detail = match self.adapter.generate(model, request.prompt_text()).await {
                Ok(text) if !text.trim().is_empty() => {
                    info!("Model {model} succeeded");
                    attempts.push(ModelAttempt {
                        model_id: model.clone(),
                        outcome: AttemptOutcome::Success(text.clone()),
                    });
                    return Generation {
                        text,
                        was_synthesized: false,
                        attempts,
                    };
                }
                Ok(_) => LlmError::EmptyContent.to_string(),
                Err(e) => e.to_string(),
            };

            warn!("Model {model} failed: {detail}");
            attempts.push(ModelAttempt {
                model_id: model.clone(),
                outcome: AttemptOutcome::Failure(detail),
            });
        }

        warn!(
            "All {} candidate models failed; synthesizing a local response",
            attempts.len()
        );

        Generation {
            text: synthesized_text(request),
            was_synthesized: true,
            attempts,
        }
    }
}

fn synthesized_text(request: &GenerationRequest) -> String {
    match request.kind() {
        GenerationKind::Chat => CHAT_FALLBACK_REPLY.to_string(),
        GenerationKind::ResumeAnalysis => {
            let result = synthesize(request.source_text());
            // Serializing plain strings and integers cannot fail.
            serde_json::to_string(&result).unwrap_or_default()
        }
    }
}
