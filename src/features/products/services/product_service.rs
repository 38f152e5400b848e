use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::products::dtos::{CreateProductDto, ProductResponseDto};
use crate::features::products::models::NewProduct;
use crate::features::products::repositories::ProductRepository;
use crate::features::products::services::sku::resolve_sku;

/// Service for catalog operations
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    /// All products ordered by name, or only the one matching `name` exactly
    pub async fn list(&self, name: Option<&str>) -> Result<Vec<ProductResponseDto>> {
        let products = match name.filter(|n| !n.trim().is_empty()) {
            Some(name) => self.products.find_by_name(name).await?.into_iter().collect(),
            None => self.products.list().await?,
        };
        Ok(products.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<ProductResponseDto> {
        self.products
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Product '{}' not found", id)))
    }

    /// Create a product; the SKU is synthesized when not supplied
    pub async fn create(&self, dto: CreateProductDto) -> Result<ProductResponseDto> {
        let name = dto.name.trim().to_string();
        let sku = resolve_sku(&name, dto.sku.as_deref());

        let product = self
            .products
            .insert(NewProduct {
                name,
                sku,
                description: dto.description,
            })
            .await?;

        tracing::info!("Product created: id={}, sku={}", product.id, product.sku);
        Ok(product.into())
    }
}
