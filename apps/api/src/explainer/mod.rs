// Resilient error-explanation service.
// Implements: cache-key derivation, TTL response cache, model tier selection,
// fallback taxonomy, and the orchestrator that ties them together.
// All LLM calls go through llm_client — no direct Groq calls here.

pub mod cache;
pub mod fallback;
pub mod handlers;
pub mod prompts;
pub mod service;
pub mod tiers;
