//! API Router configuration

use super::handlers;
use super::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Decisions
        .route("/decisions/pending", get(handlers::list_pending_decisions))
        .route("/decisions/escalated", get(handlers::list_escalated_decisions))
        .route("/decisions/:id", get(handlers::get_decision))
        .route("/decisions/:id/human-decision", post(handlers::human_decision))
        // Escalations
        .route("/escalations/pending", get(handlers::list_pending_escalations))
        .route("/escalations/:id/respond", post(handlers::respond_to_escalation))
        .route("/escalate", post(handlers::escalate))
        // Agent messages
        .route("/messages", post(handlers::inject_message))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
