//! Model tier selection — maps a requested quality/speed tier to a Groq model.
//!
//! Tier resolution must never fail a request: unknown or missing tiers fall
//! through to the balanced default.

/// Known tiers and their model identifiers, free-tier Groq models.
const MODEL_TIERS: &[(&str, &str)] = &[
    ("fast", "llama-3.1-8b-instant"),
    ("balanced", "llama-3.3-70b-versatile"),
    ("quality", "mixtral-8x7b-32768"),
];

pub const DEFAULT_TIER: &str = "balanced";

/// Resolves a tier name to a concrete model identifier.
/// `None` and unrecognized names resolve to the default tier's model.
pub fn resolve_model(tier: Option<&str>) -> &'static str {
    let requested = tier.unwrap_or(DEFAULT_TIER);
    MODEL_TIERS
        .iter()
        .find(|(name, _)| *name == requested)
        .or_else(|| MODEL_TIERS.iter().find(|(name, _)| *name == DEFAULT_TIER))
        .map(|(_, model)| *model)
        .expect("default tier must exist in MODEL_TIERS")
}
