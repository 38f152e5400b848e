use std::sync::Arc;

use axum::{
    routing::{delete, get},
    Router,
};

use crate::features::users::handlers;
use crate::features::users::services::UserService;

/// Create routes for user administration
///
/// Note: These routes require authentication; handlers enforce the admin role
pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/users", get(handlers::list_users))
        .route("/api/users/{id}", delete(handlers::delete_user))
        .with_state(service)
}
