//! Explanation cache — content-addressed, in-process, TTL-bounded.
//!
//! The key is a pure function of the error text and the leading slice of the
//! surrounding code, so identical compile errors hit the same entry across
//! requests, users, and process restarts. Tier and template hints are
//! deliberately excluded from the key: they shape presentation, not identity.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};

use crate::explainer::service::ExplanationResponse;

/// How much leading context participates in the cache key.
const CONTEXT_KEY_CHARS: usize = 200;

/// Cached explanations live for 24 hours.
pub const EXPLANATION_TTL: Duration = Duration::from_secs(60 * 60 * 24);

/// Derives the cache key for an error/context pair.
///
/// SHA-256 over the error message, a fixed delimiter, and the first 200
/// characters of context. Truncation is by characters, not bytes; byte
/// slicing could split a codepoint in pasted Unicode.
pub fn derive_cache_key(error_message: &str, context: &str) -> String {
    let context_prefix: String = context.chars().take(CONTEXT_KEY_CHARS).collect();

    let mut hasher = Sha256::new();
    hasher.update(error_message.as_bytes());
    hasher.update(b":");
    hasher.update(context_prefix.as_bytes());

    format!("latex_error:{:x}", hasher.finalize())
}

struct CacheEntry {
    value: ExplanationResponse,
    expires_at: Instant,
}

/// Shared in-process cache of explanation responses.
///
/// Cloning the handle is cheap and every clone sees the same entries.
/// Expired entries behave exactly like absent ones; a concurrent `set` racing
/// a `get` on the same key is fine — entries for a key are interchangeable,
/// last write wins.
#[derive(Clone, Default)]
pub struct ExplanationCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl ExplanationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the live entry for `key`, or `None` if never written or expired.
    pub fn get(&self, key: &str) -> Option<ExplanationResponse> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone())
    }

    /// Inserts or overwrites the entry for `key`. Never fails; a poisoned
    /// lock is recovered and the entry overwritten.
    pub fn set(&self, key: &str, value: ExplanationResponse, ttl: Duration) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }
}
