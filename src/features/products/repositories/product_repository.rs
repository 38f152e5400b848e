use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{unique_violation, AppError, Result};
use crate::features::products::models::{NewProduct, Product};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// First product with this exact name, oldest first
    async fn find_by_name(&self, name: &str) -> Result<Option<Product>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>>;

    /// Insert a product; an SKU already in use is `Conflict`
    async fn insert(&self, product: NewProduct) -> Result<Product>;

    /// All products ordered by name
    async fn list(&self) -> Result<Vec<Product>>;
}

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Product>> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, sku, description, created_at
            FROM products
            WHERE name = $1
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to find product by name: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, sku, description, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to find product by id: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn insert(&self, product: NewProduct) -> Result<Product> {
        let result = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, sku, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, sku, description, created_at
            "#,
        )
        .bind(&product.name)
        .bind(&product.sku)
        .bind(&product.description)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(created) => Ok(created),
            Err(e) if unique_violation(&e).is_some() => Err(AppError::Conflict(format!(
                "SKU '{}' already exists",
                product.sku
            ))),
            Err(e) => {
                tracing::error!("Failed to insert product: {:?}", e);
                Err(AppError::Database(e))
            }
        }
    }

    async fn list(&self) -> Result<Vec<Product>> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, sku, description, created_at
            FROM products
            ORDER BY name, created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list products: {:?}", e);
            AppError::Database(e)
        })
    }
}
