//! API router assembly.
//!
//! `main` wires concrete Postgres/storage collaborators into `Services`; tests
//! wire in-memory ones. Everything below the router is identical.

use axum::{middleware::from_fn_with_state, routing::get, Router};
use std::sync::Arc;

use crate::core::middleware;
use crate::features::auth::routes as auth_routes;
use crate::features::auth::services::{AuthService, TokenService};
use crate::features::products::{routes as products_routes, ProductService};
use crate::features::submissions::{routes as submissions_routes, IntakeService, LedgerService};
use crate::features::users::{routes as users_routes, UserService};

pub struct Services {
    pub auth: Arc<AuthService>,
    pub tokens: Arc<TokenService>,
    pub users: Arc<UserService>,
    pub products: Arc<ProductService>,
    pub intake: Arc<IntakeService>,
    pub ledger: Arc<LedgerService>,
}

async fn health_check() -> axum::http::StatusCode {
    axum::http::StatusCode::OK
}

/// Public and token-protected API routes plus `/health`
///
/// `max_body_size` bounds the multipart intake body.
pub fn api_router(services: Services, max_body_size: usize) -> Router {
    // Protected routes (require JWT authentication)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(&services.auth)))
        .merge(users_routes::routes(services.users))
        .merge(products_routes::admin_routes(Arc::clone(&services.products)))
        .merge(submissions_routes::protected_routes(services.ledger))
        .route_layer(from_fn_with_state(
            services.tokens,
            middleware::auth_middleware,
        ));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .merge(auth_routes::public_routes(services.auth))
        .merge(products_routes::public_routes(services.products))
        .merge(submissions_routes::public_routes(
            services.intake,
            max_body_size,
        ));

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{AuthConfig, BootstrapAdmin};
    use crate::shared::test_helpers::{test_auth_service, InMemoryStore, RecordingPhotoStore};
    use axum::http::StatusCode;
    use axum_test::multipart::MultipartForm;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    async fn server() -> TestServer {
        let store = Arc::new(InMemoryStore::default());
        let auth = Arc::new(test_auth_service(store.clone()));
        auth.ensure_admin(&BootstrapAdmin {
            username: "AdminBucle".to_string(),
            email: "admin@bucle.app".to_string(),
            password: "admin123".to_string(),
        })
        .await
        .unwrap();

        let services = Services {
            auth,
            tokens: Arc::new(TokenService::new(&AuthConfig::for_tests())),
            users: Arc::new(UserService::new(store.clone())),
            products: Arc::new(ProductService::new(store.clone())),
            intake: Arc::new(IntakeService::new(
                store.clone(),
                Arc::new(RecordingPhotoStore::default()),
            )),
            ledger: Arc::new(LedgerService::new(store)),
        };
        TestServer::new(api_router(services, 1024 * 1024)).unwrap()
    }

    async fn login(server: &TestServer, email: &str, password: &str) -> String {
        let response = server
            .post("/api/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        body["data"]["access_token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        server().await.get("/health").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_return_flow_end_to_end() {
        let server = server().await;

        let registered = server
            .post("/api/auth/register")
            .json(&json!({
                "username": "armando",
                "email": "armando@bucle.app",
                "password": "secreto1"
            }))
            .await;
        registered.assert_status(StatusCode::CREATED);
        let registered: Value = registered.json();
        let user_id = registered["data"]["id"].as_str().unwrap().to_string();

        let submitted = server
            .post("/api/submissions")
            .multipart(
                MultipartForm::new()
                    .add_text("product", "cilindro_rosa")
                    .add_text("confidence", "0.4")
                    .add_text("user_id", user_id.clone()),
            )
            .await;
        submitted.assert_status(StatusCode::CREATED);
        let submitted: Value = submitted.json();
        assert_eq!(submitted["data"]["status"], "rechazado");
        let submission_id = submitted["data"]["submission_id"].as_str().unwrap().to_string();

        let cliente_token = login(&server, "armando@bucle.app", "secreto1").await;
        server
            .get("/api/submissions")
            .authorization_bearer(&cliente_token)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let admin_token = login(&server, "admin@bucle.app", "admin123").await;
        server
            .put(&format!("/api/submissions/{}/status", submission_id))
            .authorization_bearer(&admin_token)
            .json(&json!({ "status": "aprobado" }))
            .await
            .assert_status_ok();

        let mine: Value = server
            .get("/api/submissions/mine")
            .authorization_bearer(&cliente_token)
            .await
            .json();
        assert_eq!(mine["meta"]["total"], 1);
        assert_eq!(mine["data"][0]["status"], "aprobado");
        assert_eq!(mine["data"][0]["product"]["name"], "cilindro_rosa");

        let products: Value = server.get("/api/products").await.json();
        assert_eq!(products["data"][0]["name"], "cilindro_rosa");
    }

    #[tokio::test]
    async fn test_protected_routes_need_token() {
        let server = server().await;
        server
            .get("/api/submissions")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        server
            .post("/api/products")
            .json(&json!({ "name": "tubo_co2" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        server
            .get("/api/products")
            .await
            .assert_status_ok();
    }
}
