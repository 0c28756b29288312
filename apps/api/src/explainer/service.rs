//! Error explanation service — orchestrates the full explanation pipeline.
//!
//! Flow: cache lookup → live inference (Groq) → validate/repair → cache write.
//! Every failure path lands in the fallback taxonomy; callers always get a
//! well-formed response and never see an error from this module.
//!
//! `cached` means "this response object came out of the cache store";
//! `fallback` means "the fallback taxonomy produced it". The flags are
//! orthogonal: a fresh fallback is `cached=false, fallback=true`, and a
//! repeat of it within the TTL is `cached=true, fallback=true`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::explainer::cache::{derive_cache_key, ExplanationCache, EXPLANATION_TTL};
use crate::explainer::fallback::match_fallback;
use crate::explainer::prompts::{
    build_explain_prompt, EXPLAINER_SYSTEM, EXPLAIN_MAX_TOKENS, EXPLAIN_TEMPERATURE,
};
use crate::explainer::tiers::resolve_model;
use crate::llm_client::{strip_json_fences, InferenceClient, InferenceRequest, LlmError};

/// Filled in when the model answers but forgets the explanation field.
const PLACEHOLDER_EXPLANATION: &str = "An error occurred in your document.";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// An explanation request. `error_message` is required and validated non-empty
/// at the request boundary; everything else is an optional hint.
#[derive(Debug, Clone, Deserialize)]
pub struct ExplainRequest {
    #[serde(default)]
    pub error_message: String,
    pub error_line: Option<u32>,
    #[serde(default)]
    pub context: String,
    pub template_type: Option<String>,
    pub model_tier: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedFix {
    pub description: String,
    pub diff: String,
    /// 0.0 – 1.0
    pub confidence: f32,
}

/// The response every explanation request resolves to, live or degraded.
/// `explanation` is never empty.
#[derive(Debug, Clone, Serialize)]
pub struct ExplanationResponse {
    pub explanation: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<SuggestedFix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_tip: Option<String>,
    pub cached: bool,
    pub fallback: bool,
}

/// What the model actually sends back — every field optional so a partially
/// valid answer can be repaired instead of discarded.
#[derive(Debug, Deserialize)]
struct RawExplanation {
    explanation: Option<String>,
    severity: Option<Severity>,
    suggested_fix: Option<SuggestedFix>,
    learning_tip: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

/// Explains a LaTeX error. Never fails: unavailable clients, transport
/// errors, and malformed model output all degrade to the fallback taxonomy.
///
/// Steps:
/// 1. Cache lookup on (error_message, context) — hit returns with `cached=true`
/// 2. No client configured → fallback
/// 3. Resolve model tier, build prompt, single inference attempt
/// 4. Validate/repair the JSON answer; cache and return on success
/// 5. Any failure → fallback (also cached, so repeats are hits)
pub async fn explain_error(
    llm: Option<&Arc<dyn InferenceClient>>,
    cache: &ExplanationCache,
    request: &ExplainRequest,
) -> ExplanationResponse {
    let key = derive_cache_key(&request.error_message, &request.context);

    if let Some(mut hit) = cache.get(&key) {
        debug!("Cache hit for error: {}", truncate(&request.error_message, 50));
        hit.cached = true;
        return hit;
    }

    let Some(client) = llm else {
        warn!("No inference client configured, using fallback");
        return fallback_and_cache(cache, &key, &request.error_message);
    };

    let inference = InferenceRequest {
        model: resolve_model(request.model_tier.as_deref()).to_string(),
        system: EXPLAINER_SYSTEM.to_string(),
        prompt: build_explain_prompt(request),
        temperature: EXPLAIN_TEMPERATURE,
        max_tokens: EXPLAIN_MAX_TOKENS,
        json_output: true,
    };

    let raw_text = match client.complete(inference).await {
        Ok(text) => text,
        Err(e) => {
            warn!("LLM call failed: {e}");
            return fallback_and_cache(cache, &key, &request.error_message);
        }
    };

    let response = match parse_explanation(&raw_text) {
        Ok(response) => response,
        Err(e) => {
            warn!("Failed to parse LLM response as JSON: {e}");
            return fallback_and_cache(cache, &key, &request.error_message);
        }
    };

    cache.set(&key, response.clone(), EXPLANATION_TTL);
    info!(
        "LLM response cached for: {}",
        truncate(&request.error_message, 50)
    );

    response
}

/// Computes a fresh fallback response, caches it under `key`, and returns it.
/// The returned value is a fresh computation, not a cache retrieval, so
/// `cached` stays false; the next identical request will hit the cache.
fn fallback_and_cache(
    cache: &ExplanationCache,
    key: &str,
    error_message: &str,
) -> ExplanationResponse {
    let response = match_fallback(error_message);
    cache.set(key, response.clone(), EXPLANATION_TTL);
    response
}

/// Parses and repairs a raw model answer.
///
/// Unparseable text is an error (the caller falls back). A parseable answer
/// with gaps is repaired: missing or empty `explanation` becomes a
/// placeholder, missing `severity` defaults to `error`, and fix confidence is
/// clamped into [0, 1].
fn parse_explanation(raw_text: &str) -> Result<ExplanationResponse, LlmError> {
    let raw: RawExplanation = serde_json::from_str(strip_json_fences(raw_text))?;

    Ok(ExplanationResponse {
        explanation: raw
            .explanation
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| PLACEHOLDER_EXPLANATION.to_string()),
        severity: raw.severity.unwrap_or(Severity::Error),
        suggested_fix: raw.suggested_fix.map(|mut fix| {
            fix.confidence = fix.confidence.clamp(0.0, 1.0);
            fix
        }),
        learning_tip: raw.learning_tip,
        cached: false,
        fallback: false,
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies with a fixed body on every call.
    struct StaticClient {
        reply: &'static str,
    }

    #[async_trait]
    impl InferenceClient for StaticClient {
        async fn complete(&self, _request: InferenceRequest) -> Result<String, LlmError> {
            Ok(self.reply.to_string())
        }
    }

    /// Fails every call with a server error.
    struct FailingClient;

    #[async_trait]
    impl InferenceClient for FailingClient {
        async fn complete(&self, _request: InferenceRequest) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 500,
                message: "upstream unavailable".to_string(),
            })
        }
    }

    /// Records the request it was given, then replies.
    struct CapturingClient {
        seen: Mutex<Option<InferenceRequest>>,
        reply: &'static str,
    }

    #[async_trait]
    impl InferenceClient for CapturingClient {
        async fn complete(&self, request: InferenceRequest) -> Result<String, LlmError> {
            *self.seen.lock().unwrap() = Some(request);
            Ok(self.reply.to_string())
        }
    }

    const VALID_REPLY: &str = r#"{
        "explanation": "You typed \\texbf but the command is \\textbf.",
        "severity": "error",
        "suggested_fix": {
            "description": "Fix the typo",
            "diff": "- \\texbf{Skills}\n+ \\textbf{Skills}",
            "confidence": 0.9
        },
        "learning_tip": "Typos in command names are the most common LaTeX error."
    }"#;

    fn request(error_message: &str) -> ExplainRequest {
        ExplainRequest {
            error_message: error_message.to_string(),
            error_line: None,
            context: String::new(),
            template_type: None,
            model_tier: None,
        }
    }

    fn client(c: impl InferenceClient + 'static) -> Arc<dyn InferenceClient> {
        Arc::new(c)
    }

    #[tokio::test]
    async fn test_no_client_returns_wellformed_fallback() {
        let cache = ExplanationCache::new();
        let response = explain_error(None, &cache, &request("Undefined control sequence")).await;

        assert!(response.fallback);
        assert!(!response.cached);
        assert_eq!(response.severity, Severity::Error);
        assert!(response.explanation.contains("typo") || response.explanation.contains("package"));
    }

    #[tokio::test]
    async fn test_no_client_fallback_is_cached_for_repeats() {
        let cache = ExplanationCache::new();
        let req = request("Undefined control sequence");

        let first = explain_error(None, &cache, &req).await;
        let second = explain_error(None, &cache, &req).await;

        assert!(!first.cached);
        assert!(second.cached, "repeat within TTL must be a cache hit");
        assert!(second.fallback, "fallback flag survives the cache round-trip");
        assert_eq!(first.explanation, second.explanation);
    }

    #[tokio::test]
    async fn test_transport_error_falls_back() {
        let cache = ExplanationCache::new();
        let llm = client(FailingClient);
        let response = explain_error(Some(&llm), &cache, &request("Missing $ inserted")).await;

        assert!(response.fallback);
        assert!(response.explanation.contains("math"));
    }

    #[tokio::test]
    async fn test_malformed_output_falls_back() {
        let cache = ExplanationCache::new();
        let llm = client(StaticClient {
            reply: "Sorry, I can't produce JSON today.",
        });
        let response = explain_error(Some(&llm), &cache, &request("Extra }")).await;

        assert!(response.fallback);
        assert!(!response.explanation.is_empty());
    }

    #[tokio::test]
    async fn test_successful_call_then_cache_hit() {
        let cache = ExplanationCache::new();
        let llm = client(StaticClient { reply: VALID_REPLY });
        let req = request("Undefined control sequence \\texbf");

        let first = explain_error(Some(&llm), &cache, &req).await;
        assert!(!first.cached);
        assert!(!first.fallback);
        assert!(first.explanation.contains("\\textbf"));

        let second = explain_error(Some(&llm), &cache, &req).await;
        assert!(second.cached);
        assert!(!second.fallback);
        assert_eq!(first.explanation, second.explanation);
    }

    #[tokio::test]
    async fn test_fenced_json_is_accepted() {
        let cache = ExplanationCache::new();
        let llm = client(StaticClient {
            reply: "```json\n{\"explanation\": \"Close the brace.\", \"severity\": \"error\"}\n```",
        });
        let response = explain_error(Some(&llm), &cache, &request("Missing }")).await;

        assert!(!response.fallback);
        assert_eq!(response.explanation, "Close the brace.");
    }

    #[tokio::test]
    async fn test_missing_severity_defaults_to_error() {
        let cache = ExplanationCache::new();
        let llm = client(StaticClient {
            reply: r#"{"explanation": "Something broke."}"#,
        });
        let response = explain_error(Some(&llm), &cache, &request("weird error")).await;

        assert!(!response.fallback);
        assert_eq!(response.severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_missing_explanation_gets_placeholder() {
        let cache = ExplanationCache::new();
        let llm = client(StaticClient {
            reply: r#"{"severity": "warning", "learning_tip": "tip"}"#,
        });
        let response = explain_error(Some(&llm), &cache, &request("Overfull \\hbox")).await;

        assert!(!response.fallback);
        assert_eq!(response.explanation, PLACEHOLDER_EXPLANATION);
        assert_eq!(response.severity, Severity::Warning);
    }

    #[tokio::test]
    async fn test_fix_confidence_is_clamped() {
        let cache = ExplanationCache::new();
        let llm = client(StaticClient {
            reply: r#"{
                "explanation": "e",
                "suggested_fix": {"description": "d", "diff": "- a\n+ b", "confidence": 3.5}
            }"#,
        });
        let response = explain_error(Some(&llm), &cache, &request("some error")).await;

        let fix = response.suggested_fix.expect("fix should survive repair");
        assert!((fix.confidence - 1.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_unknown_tier_resolves_to_default_model() {
        let cache = ExplanationCache::new();
        let capturing = Arc::new(CapturingClient {
            seen: Mutex::new(None),
            reply: VALID_REPLY,
        });
        let llm: Arc<dyn InferenceClient> = capturing.clone();

        let mut req = request("Missing } inserted");
        req.model_tier = Some("nonexistent-tier".to_string());
        let response = explain_error(Some(&llm), &cache, &req).await;
        assert!(!response.fallback);

        let seen = capturing.seen.lock().unwrap();
        let inference = seen.as_ref().expect("client should have been called");
        assert_eq!(inference.model, "llama-3.3-70b-versatile");
        assert!(inference.json_output);
        assert!(inference.prompt.contains("Missing } inserted"));
    }

    #[tokio::test]
    async fn test_tier_does_not_affect_cache_key() {
        let cache = ExplanationCache::new();
        let llm = client(StaticClient { reply: VALID_REPLY });

        let mut fast = request("Missing } inserted");
        fast.model_tier = Some("fast".to_string());
        let first = explain_error(Some(&llm), &cache, &fast).await;
        assert!(!first.cached);

        let mut quality = request("Missing } inserted");
        quality.model_tier = Some("quality".to_string());
        let second = explain_error(Some(&llm), &cache, &quality).await;
        assert!(
            second.cached,
            "same error/context must hit the cache regardless of tier"
        );
    }

    #[tokio::test]
    async fn test_distinct_context_misses_cache() {
        let cache = ExplanationCache::new();
        let llm = client(StaticClient { reply: VALID_REPLY });

        let mut a = request("Missing } inserted");
        a.context = "\\begin{itemize}".to_string();
        explain_error(Some(&llm), &cache, &a).await;

        let mut b = request("Missing } inserted");
        b.context = "\\section{Skills}".to_string();
        let response = explain_error(Some(&llm), &cache, &b).await;
        assert!(!response.cached, "different context must derive a different key");
    }
}
