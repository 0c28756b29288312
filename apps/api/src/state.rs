use std::sync::Arc;

use crate::explainer::cache::ExplanationCache;
use crate::llm_client::InferenceClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Inference client, resolved once at startup. `None` means no API key
    /// was configured and the explainer runs in fallback-only mode for the
    /// life of the process.
    pub llm: Option<Arc<dyn InferenceClient>>,
    /// Explanation cache shared across all concurrent requests.
    pub cache: ExplanationCache,
}
