mod analysis;
mod config;
mod errors;
mod llm_client;
mod routes;
mod state;
mod users;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::fallback::FallbackOrchestrator;
use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::users::store::UserStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Placement API v{}", env!("CARGO_PKG_VERSION"));

    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; responses will be synthesized locally");
    }

    // Initialize the Gemini adapter and the fallback chain that owns it
    let gemini = GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_api_base.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    let orchestrator = FallbackOrchestrator::new(Arc::new(gemini), config.candidate_models.clone());
    info!(
        "Fallback chain initialized: {}",
        orchestrator.candidate_models().join(" -> ")
    );

    // Initialize the user store
    let users = UserStore::new(config.users_file.clone());
    let seeded = users.load_all().await?;
    info!(
        "User store {} loaded ({} users)",
        users.path().display(),
        seeded.len()
    );

    let state = AppState {
        orchestrator: Arc::new(orchestrator),
        users: Arc::new(users),
        max_upload_bytes: config.max_upload_bytes,
    };

    info!("Resume uploads capped at {} bytes", state.max_upload_bytes);
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
