//! Fallback taxonomy — canned, beginner-safe explanations for common LaTeX
//! errors, used whenever live inference is unavailable or unusable.
//!
//! The table is ordered and the first matching rule wins; reordering rules is
//! a behavior change, not a cleanup. Matching is substring containment over
//! the lowercased error message.

use crate::explainer::service::{ExplanationResponse, Severity, SuggestedFix};

struct FallbackRule {
    /// Lowercase substring to look for in the normalized error message.
    pattern: &'static str,
    explanation: &'static str,
    severity: Severity,
    fix: Option<FixTemplate>,
    learning_tip: Option<&'static str>,
}

struct FixTemplate {
    description: &'static str,
    diff: &'static str,
    confidence: f32,
}

const FALLBACK_RULES: &[FallbackRule] = &[
    FallbackRule {
        pattern: "missing }",
        explanation: "You forgot to close a curly brace somewhere. Every { needs a matching }.",
        severity: Severity::Error,
        fix: Some(FixTemplate {
            description: "Look for an opening { and add the missing }",
            diff: "- \\begin{itemize\n+ \\begin{itemize}",
            confidence: 0.8,
        }),
        learning_tip: Some(
            "In LaTeX, curly braces {} always come in pairs. Missing one will break your document.",
        ),
    },
    FallbackRule {
        pattern: "undefined control sequence",
        explanation: "You used a command that LaTeX doesn't recognize. This usually means a typo or missing package.",
        severity: Severity::Error,
        fix: Some(FixTemplate {
            description: "Check the spelling of your command",
            diff: "- \\texbf{text}\n+ \\textbf{text}",
            confidence: 0.7,
        }),
        learning_tip: Some("LaTeX commands start with \\. Make sure you spelled it correctly!"),
    },
    FallbackRule {
        pattern: "missing $ inserted",
        explanation: "You used a math symbol outside of math mode. Wrap it in $ signs.",
        severity: Severity::Error,
        fix: Some(FixTemplate {
            description: "Add $ around the math content",
            diff: "- x^2\n+ $x^2$",
            confidence: 0.9,
        }),
        learning_tip: Some(
            "Math symbols like ^, _, and Greek letters need to be inside $...$ or \\[...\\].",
        ),
    },
    FallbackRule {
        pattern: "extra }",
        explanation: "You have an extra closing brace } that doesn't match an opening one.",
        severity: Severity::Error,
        fix: Some(FixTemplate {
            description: "Remove the extra } or add the missing {",
            diff: "- text}}\n+ text}",
            confidence: 0.8,
        }),
        learning_tip: Some("Count your braces! Every { needs exactly one matching }."),
    },
    FallbackRule {
        pattern: "missing \\begin{document}",
        explanation: "Your document is missing the \\begin{document} command that starts the content.",
        severity: Severity::Error,
        fix: Some(FixTemplate {
            description: "Add \\begin{document} after your preamble",
            diff: "+ \\begin{document}",
            confidence: 0.95,
        }),
        learning_tip: Some("Every LaTeX document needs \\begin{document} and \\end{document}."),
    },
    FallbackRule {
        pattern: "file not found",
        explanation: "LaTeX is trying to load a file that doesn't exist. Check if you uploaded all your files.",
        severity: Severity::Error,
        fix: None,
        learning_tip: Some("Make sure all files referenced in your document are uploaded."),
    },
    FallbackRule {
        pattern: "environment",
        explanation: "There's a problem with how you opened or closed an environment (like itemize, enumerate, etc.).",
        severity: Severity::Error,
        fix: Some(FixTemplate {
            description: "Make sure \\begin{...} has a matching \\end{...}",
            diff: "- \\begin{itemize}\n- \\item One\n+ \\begin{itemize}\n+ \\item One\n+ \\end{itemize}",
            confidence: 0.8,
        }),
        learning_tip: Some("Every \\begin{something} needs a matching \\end{something}."),
    },
];

const GENERIC_EXPLANATION: &str = "There's an error in your document. Check the highlighted line \
    for issues like missing brackets, typos, or incorrect commands.";

const GENERIC_TIP: &str = "LaTeX errors usually point to the line where the problem is. \
    Look carefully at that line and the ones before it.";

/// Returns the canned response for the first rule matching `error_message`,
/// or the generic response when nothing matches. Always produces a value;
/// `cached` is left false — whether this response later counts as cached is
/// the orchestrator's business, not the taxonomy's.
pub fn match_fallback(error_message: &str) -> ExplanationResponse {
    let normalized = error_message.to_lowercase();

    for rule in FALLBACK_RULES {
        if normalized.contains(rule.pattern) {
            return rule.to_response();
        }
    }

    ExplanationResponse {
        explanation: GENERIC_EXPLANATION.to_string(),
        severity: Severity::Error,
        suggested_fix: None,
        learning_tip: Some(GENERIC_TIP.to_string()),
        cached: false,
        fallback: true,
    }
}

impl FallbackRule {
    fn to_response(&self) -> ExplanationResponse {
        ExplanationResponse {
            explanation: self.explanation.to_string(),
            severity: self.severity,
            suggested_fix: self.fix.as_ref().map(|f| SuggestedFix {
                description: f.description.to_string(),
                diff: f.diff.to_string(),
                confidence: f.confidence,
            }),
            learning_tip: self.learning_tip.map(str::to_string),
            cached: false,
            fallback: true,
        }
    }
}
