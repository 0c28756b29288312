//! Template detection — identifies which resume template a document uses.
//!
//! Ordered signature table, evaluated top to bottom; the `simple` signature is
//! last and weakest because `\documentclass{article}` matches many documents.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::templates::zones::find_template;

/// Detection signatures in evaluation order. `simple` must stay last.
const DETECTION_PATTERNS: &[(&str, &str)] = &[
    ("jake-resume", r"resumeSubheading|%-+.*-+"),
    ("deedy-cv", r"deedy|\\namesection"),
    ("altacv", r"altacv|\\makecvheader"),
    ("moderncv", r"moderncv|\\cventry"),
    ("simple", r"\\documentclass\{article\}"),
];

#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    pub template_id: &'static str,
    pub template_name: &'static str,
    pub confidence: f32,
}

/// Detects the template type of `content`.
/// Unknown content gets `template_id = "unknown"` with zero confidence
/// rather than an error — detection is advisory.
pub fn detect_template(content: &str) -> Detection {
    for (template_id, regex) in compiled_patterns() {
        if regex.is_match(content) {
            let template_id = *template_id;
            let confidence = if template_id == "simple" { 0.6 } else { 0.9 };
            let template_name = find_template(template_id)
                .map(|t| t.template_name)
                .unwrap_or("Unknown Template");
            return Detection {
                template_id,
                template_name,
                confidence,
            };
        }
    }

    Detection {
        template_id: "unknown",
        template_name: "Unknown Template",
        confidence: 0.0,
    }
}

fn compiled_patterns() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        DETECTION_PATTERNS
            .iter()
            .map(|(id, pattern)| {
                let regex = Regex::new(&format!("(?i){pattern}"))
                    .expect("detection patterns are fixed and must compile");
                (*id, regex)
            })
            .collect()
    })
}
