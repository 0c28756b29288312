//! Axum route handlers for the error-explanation API.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::explainer::service::{
    explain_error, ExplainRequest, ExplanationResponse, Severity, SuggestedFix,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct FixResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<SuggestedFix>,
    pub explanation: String,
    pub fallback: bool,
}

/// A common error pattern, shipped to clients for instant local matching
/// before they round-trip to the explain endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorPattern {
    pub pattern: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub severity: Severity,
    pub quick_fix: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PatternsResponse {
    pub patterns: &'static [ErrorPattern],
}

const ERROR_PATTERNS: &[ErrorPattern] = &[
    ErrorPattern {
        pattern: "Missing }",
        kind: "syntax",
        severity: Severity::Error,
        quick_fix: "Add missing closing brace",
    },
    ErrorPattern {
        pattern: "Undefined control sequence",
        kind: "command",
        severity: Severity::Error,
        quick_fix: "Check command spelling or add package",
    },
    ErrorPattern {
        pattern: "Missing $ inserted",
        kind: "math",
        severity: Severity::Error,
        quick_fix: "Wrap math content in $ signs",
    },
    ErrorPattern {
        pattern: "Extra }",
        kind: "syntax",
        severity: Severity::Error,
        quick_fix: "Remove extra closing brace",
    },
    ErrorPattern {
        pattern: "File .* not found",
        kind: "file",
        severity: Severity::Error,
        quick_fix: "Upload missing file or fix path",
    },
    ErrorPattern {
        pattern: "Overfull \\hbox",
        kind: "layout",
        severity: Severity::Warning,
        quick_fix: "Content too wide, may need reformatting",
    },
    ErrorPattern {
        pattern: "Underfull \\hbox",
        kind: "layout",
        severity: Severity::Warning,
        quick_fix: "Line has too much space",
    },
];

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/errors/explain
///
/// Explains a LaTeX error in plain English. Always answers 200 with a
/// well-formed explanation for a valid request; the `fallback` and `cached`
/// flags tell the client how the answer was produced.
pub async fn handle_explain(
    State(state): State<AppState>,
    Json(request): Json<ExplainRequest>,
) -> Result<Json<ExplanationResponse>, AppError> {
    validate(&request)?;

    let response = explain_error(state.llm.as_ref(), &state.cache, &request).await;

    Ok(Json(response))
}

/// POST /api/v1/errors/fix
///
/// Runs the same pipeline as explain and projects out the suggested fix.
/// `fix` is absent when neither the model nor the taxonomy had one to offer.
pub async fn handle_fix(
    State(state): State<AppState>,
    Json(request): Json<ExplainRequest>,
) -> Result<Json<FixResponse>, AppError> {
    validate(&request)?;

    let response = explain_error(state.llm.as_ref(), &state.cache, &request).await;

    Ok(Json(FixResponse {
        fix: response.suggested_fix,
        explanation: response.explanation,
        fallback: response.fallback,
    }))
}

/// GET /api/v1/errors/patterns
///
/// Common error patterns for client-side matching.
pub async fn handle_patterns() -> Json<PatternsResponse> {
    Json(PatternsResponse {
        patterns: ERROR_PATTERNS,
    })
}

/// The one caller-input error the explainer core refuses to absorb:
/// a missing or empty `error_message` is rejected before orchestration.
fn validate(request: &ExplainRequest) -> Result<(), AppError> {
    if request.error_message.trim().is_empty() {
        return Err(AppError::Validation(
            "error_message is required".to_string(),
        ));
    }
    Ok(())
}
