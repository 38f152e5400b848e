use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::products::dtos::{CreateProductDto, ListProductsQuery, ProductResponseDto};
use crate::features::products::services::ProductService;
use crate::shared::types::{ApiResponse, Meta};

/// List the catalog
#[utoipa::path(
    get,
    path = "/api/products",
    params(ListProductsQuery),
    responses(
        (status = 200, description = "Products ordered by name", body = ApiResponse<Vec<ProductResponseDto>>)
    ),
    tag = "products"
)]
pub async fn list_products(
    State(service): State<Arc<ProductService>>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<ApiResponse<Vec<ProductResponseDto>>>> {
    let products = service.list(query.name.as_deref()).await?;
    let meta = Meta::total(products.len());
    Ok(Json(ApiResponse::success(Some(products), None, Some(meta))))
}

/// Get product by ID
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ApiResponse<ProductResponseDto>),
        (status = 404, description = "Product not found")
    ),
    tag = "products"
)]
pub async fn get_product(
    State(service): State<Arc<ProductService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProductResponseDto>>> {
    let product = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(product), None, None)))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductDto,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "SKU already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn create_product(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ProductService>>,
    AppJson(dto): AppJson<CreateProductDto>,
) -> Result<(StatusCode, Json<ApiResponse<ProductResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let product = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(product),
            Some("Product created successfully".to_string()),
            None,
        )),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::products::routes;
    use crate::shared::test_helpers::{with_admin_auth, with_cliente_auth, InMemoryStore};
    use axum::Router;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn server(store: Arc<InMemoryStore>, admin: bool) -> TestServer {
        let service = Arc::new(ProductService::new(store));
        let admin_routes = routes::admin_routes(service.clone());
        let admin_routes = if admin {
            with_admin_auth(admin_routes)
        } else {
            with_cliente_auth(admin_routes)
        };
        let app = Router::new()
            .merge(routes::public_routes(service))
            .merge(admin_routes);
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_list_is_public() {
        let store = Arc::new(InMemoryStore::default());
        store.seed_product("tubo_co2", "TUBO-CO2-STD");

        let response = server(store, false).get("/api/products").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"][0]["sku"], "TUBO-CO2-STD");
    }

    #[tokio::test]
    async fn test_list_by_name() {
        let store = Arc::new(InMemoryStore::default());
        store.seed_product("tubo_co2", "TUBO-CO2-STD");
        store.seed_product("matafuego_rojo", "MAT-ROJO-X5");

        let response = server(store, false)
            .get("/api/products")
            .add_query_param("name", "matafuego_rojo")
            .await;
        let body: Value = response.json();
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"][0]["sku"], "MAT-ROJO-X5");
    }

    #[tokio::test]
    async fn test_create_requires_admin() {
        let response = server(Arc::new(InMemoryStore::default()), false)
            .post("/api/products")
            .json(&json!({ "name": "tubo_co2" }))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_sku() {
        let response = server(Arc::new(InMemoryStore::default()), true)
            .post("/api/products")
            .json(&json!({ "name": "tubo_co2", "sku": "TUBO CO2" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let server = server(Arc::new(InMemoryStore::default()), true);
        let response = server
            .post("/api/products")
            .json(&json!({ "name": "tubo_co2", "sku": "TUBO-CO2-STD" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let fetched = server.get(&format!("/api/products/{}", id)).await;
        fetched.assert_status_ok();
        let fetched: Value = fetched.json();
        assert_eq!(fetched["data"]["name"], "tubo_co2");
    }
}
