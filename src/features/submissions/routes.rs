use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::features::submissions::handlers;
use crate::features::submissions::services::{IntakeService, LedgerService};

/// Intake route; no token required
///
/// `body_limit` caps the whole multipart body, photo included.
pub fn public_routes(service: Arc<IntakeService>, body_limit: usize) -> Router {
    Router::new()
        .route(
            "/api/submissions",
            post(handlers::submit_return).layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(service)
}

/// Ledger routes; require authentication, handlers enforce roles
pub fn protected_routes(service: Arc<LedgerService>) -> Router {
    Router::new()
        .route("/api/submissions", get(handlers::list_submissions))
        .route("/api/submissions/mine", get(handlers::list_my_submissions))
        .route("/api/submissions/{id}", get(handlers::get_submission))
        .route(
            "/api/submissions/{id}/status",
            put(handlers::update_submission_status),
        )
        .with_state(service)
}
