use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::products::dtos::ProductResponseDto;
use crate::features::submissions::models::{
    IntakeOutcome, SubmissionStatus, SubmissionWithProduct,
};

/// Return submission form for OpenAPI documentation.
/// The handler reads the multipart body field by field.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmitReturnForm {
    /// Product name as recognized by the classifier
    #[schema(example = "cilindro_rosa")]
    pub product: String,
    /// Classifier confidence; approved when above 0.65
    #[schema(example = 0.9)]
    pub confidence: f64,
    /// Submitting user's id
    pub user_id: String,
    /// SKU to use if the product has to be created
    pub manual_sku: Option<String>,
    /// Photo of the returned item
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub photo: Option<String>,
}

/// Outcome of a return submission
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResultDto {
    pub submission_id: Uuid,
    pub product_name: String,
    pub sku: String,
    pub status: SubmissionStatus,
    /// True when this submission introduced the product to the catalog
    pub product_created: bool,
    pub photo_url: Option<String>,
}

impl From<IntakeOutcome> for SubmissionResultDto {
    fn from(outcome: IntakeOutcome) -> Self {
        Self {
            submission_id: outcome.submission.id,
            product_name: outcome.product.name,
            sku: outcome.product.sku,
            status: outcome.submission.status,
            product_created: outcome.product_created,
            photo_url: outcome.submission.photo_url,
        }
    }
}

/// Ledger entry with its product
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResponseDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product: ProductResponseDto,
    pub submitted_at: DateTime<Utc>,
    pub status: SubmissionStatus,
    pub returned_quantity: i32,
    pub photo_url: Option<String>,
    pub confidence: f64,
}

impl From<SubmissionWithProduct> for SubmissionResponseDto {
    fn from(entry: SubmissionWithProduct) -> Self {
        let s = entry.submission;
        Self {
            id: s.id,
            user_id: s.user_id,
            product: entry.product.into(),
            submitted_at: s.submitted_at,
            status: s.status,
            returned_quantity: s.returned_quantity,
            photo_url: s.photo_url,
            confidence: s.confidence,
        }
    }
}

/// Request DTO for overriding a submission decision
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusDto {
    /// One of `pendiente`, `aprobado`, `rechazado`
    #[serde(alias = "estado")]
    #[schema(example = "aprobado")]
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdatedDto {
    pub id: Uuid,
    pub status: SubmissionStatus,
}
