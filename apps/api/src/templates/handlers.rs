//! Axum route handlers for the template metadata API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;
use crate::templates::detect::{detect_template, Detection};
use crate::templates::zones::{find_template, TemplateSpec, TEMPLATES};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TemplateSummary {
    pub id: &'static str,
    pub name: &'static str,
    pub source: &'static str,
    pub zone_count: usize,
}

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<TemplateSummary>,
}

#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    #[serde(default)]
    pub content: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/templates
///
/// Lists all supported templates.
pub async fn handle_list_templates(
    State(_state): State<AppState>,
) -> Json<TemplateListResponse> {
    let templates = TEMPLATES
        .iter()
        .map(|t| TemplateSummary {
            id: t.template_id,
            name: t.template_name,
            source: t.source,
            zone_count: t.zones.len(),
        })
        .collect();

    Json(TemplateListResponse { templates })
}

/// GET /api/v1/templates/:template_id/zones
///
/// Zone definitions for a specific template.
pub async fn handle_template_zones(
    State(_state): State<AppState>,
    Path(template_id): Path<String>,
) -> Result<Json<&'static TemplateSpec>, AppError> {
    let template = find_template(&template_id)
        .ok_or_else(|| AppError::NotFound(format!("Template not found: {template_id}")))?;

    Ok(Json(template))
}

/// POST /api/v1/templates/detect
///
/// Detects the template type from document content.
pub async fn handle_detect_template(
    State(_state): State<AppState>,
    Json(request): Json<DetectRequest>,
) -> Result<Json<Detection>, AppError> {
    if request.content.is_empty() {
        return Err(AppError::Validation("content is required".to_string()));
    }

    Ok(Json(detect_template(&request.content)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_summary_shape() {
        let first = &TEMPLATES[0];
        let summary = TemplateSummary {
            id: first.template_id,
            name: first.template_name,
            source: first.source,
            zone_count: first.zones.len(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["id"], "jake-resume");
        assert_eq!(json["zone_count"], 7);
    }

    #[test]
    fn test_detect_request_defaults_to_empty_content() {
        let request: DetectRequest = serde_json::from_str("{}").unwrap();
        assert!(request.content.is_empty());
    }
}
