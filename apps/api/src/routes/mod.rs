pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::explainer::handlers as error_handlers;
use crate::state::AppState;
use crate::templates::handlers as template_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Error explanation API
        .route(
            "/api/v1/errors/explain",
            post(error_handlers::handle_explain),
        )
        .route("/api/v1/errors/fix", post(error_handlers::handle_fix))
        .route(
            "/api/v1/errors/patterns",
            get(error_handlers::handle_patterns),
        )
        // Template metadata API
        .route(
            "/api/v1/templates",
            get(template_handlers::handle_list_templates),
        )
        .route(
            "/api/v1/templates/:template_id/zones",
            get(template_handlers::handle_template_zones),
        )
        .route(
            "/api/v1/templates/detect",
            post(template_handlers::handle_detect_template),
        )
        .with_state(state)
}
