mod config;
mod errors;
mod explainer;
mod llm_client;
mod routes;
mod state;
mod templates;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::explainer::cache::ExplanationCache;
use crate::llm_client::{GroqClient, InferenceClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Target names use underscores even when the crate name is hyphenated
            let target = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{}={}", target, &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting EasyLeaf API v{}", env!("CARGO_PKG_VERSION"));

    // Resolve the inference client once. Missing key is not an error:
    // the explainer serves fallback responses for the life of the process.
    let llm: Option<Arc<dyn InferenceClient>> = match &config.groq_api_key {
        Some(key) => {
            info!("Groq client initialized");
            Some(Arc::new(GroqClient::new(key.clone())))
        }
        None => {
            warn!("GROQ_API_KEY is not set. Error explanations will use fallback responses.");
            None
        }
    };

    // Shared explanation cache
    let cache = ExplanationCache::new();

    // Build app state
    let state = AppState { llm, cache };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
