use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_API_BASE, DEFAULT_MODELS};

pub const DEFAULT_MAX_UPLOAD_MB: usize = 10;

/// Application configuration loaded from environment variables.
/// Only malformed values fail startup; everything else has a default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absent key is allowed: every remote attempt fails and synthesis answers.
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub candidate_models: Vec<String>,
    pub llm_timeout_secs: u64,
    pub users_file: PathBuf,
    /// Request body cap for resume uploads.
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_api_base: optional_env("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            candidate_models: optional_env("GEMINI_MODELS")
                .map(|raw| parse_model_list(&raw))
                .filter(|models| !models.is_empty())
                .unwrap_or_else(default_models),
            llm_timeout_secs: optional_env("LLM_TIMEOUT_SECS")
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?
                .unwrap_or(60),
            users_file: optional_env("USERS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("users.json")),
            max_upload_bytes: optional_env("MAX_UPLOAD_MB")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MAX_UPLOAD_MB must be a whole number of megabytes")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_MB)
                * 1024
                * 1024,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

pub fn default_models() -> Vec<String> {
    DEFAULT_MODELS.iter().map(|m| m.to_string()).collect()
}

/// Splits a comma-separated model list, dropping blanks.
fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
        .collect()
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_list_trims_and_drops_blanks() {
        let models = parse_model_list(" gemini-2.0-flash, ,gemini-pro-latest ,");
        assert_eq!(models, vec!["gemini-2.0-flash", "gemini-pro-latest"]);
    }

    #[test]
    fn test_default_models_priority_order() {
        let models = default_models();
        assert_eq!(models.first().map(String::as_str), Some("gemini-2.0-flash"));
        assert_eq!(models.len(), 5);
    }
}
