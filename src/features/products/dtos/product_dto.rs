use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::products::models::Product;
use crate::shared::validation::SKU_REGEX;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponseDto {
    pub id: Uuid,
    #[schema(example = "cilindro_rosa_nuevo")]
    pub name: String,
    #[schema(example = "CIL-ROSA-001")]
    pub sku: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductResponseDto {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            sku: p.sku,
            description: p.description,
            created_at: p.created_at,
        }
    }
}

/// Query parameters for listing products
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListProductsQuery {
    /// Exact product name to look up
    pub name: Option<String>,
}

/// Request DTO for creating a product
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductDto {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    /// Synthesized as `AUTO-XXX-XXXX` when omitted
    #[validate(
        length(min = 1, max = 64, message = "SKU must be 1-64 characters"),
        regex(
            path = *SKU_REGEX,
            message = "SKU must be alphanumeric segments separated by single hyphens"
        )
    )]
    pub sku: Option<String>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}
