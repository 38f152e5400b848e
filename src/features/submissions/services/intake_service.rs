use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::products::services::sku::resolve_sku;
use crate::features::submissions::dtos::SubmissionResultDto;
use crate::features::submissions::models::{no_photo, NewIntake, PhotoWrite, SubmissionStatus};
use crate::features::submissions::repositories::SubmissionRepository;
use crate::modules::storage::PhotoStore;
use crate::shared::constants::{ALLOWED_PHOTO_TYPES, MAX_PHOTO_SIZE};

/// Photo attached to a return
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// A return as received from the client, before any validation
#[derive(Debug, Clone)]
pub struct SubmitReturn {
    pub product_name: String,
    pub confidence: f64,
    pub submitter_id: String,
    pub manual_sku: Option<String>,
    pub photo: Option<PhotoUpload>,
}

/// Service for the return intake workflow
pub struct IntakeService {
    submissions: Arc<dyn SubmissionRepository>,
    photos: Arc<dyn PhotoStore>,
}

impl IntakeService {
    pub fn new(submissions: Arc<dyn SubmissionRepository>, photos: Arc<dyn PhotoStore>) -> Self {
        Self {
            submissions,
            photos,
        }
    }

    /// Record a returned item
    ///
    /// All argument checks run before anything is written. The product name
    /// is matched exactly as given. An existing product is reused and any
    /// `manual_sku` is then ignored. The photo is stored only once the
    /// product is resolved and the submitter exists; if storing it fails,
    /// nothing is recorded.
    pub async fn submit_return(&self, request: SubmitReturn) -> Result<SubmissionResultDto> {
        let user_id = Uuid::parse_str(request.submitter_id.trim()).map_err(|_| {
            AppError::InvalidArgument(format!(
                "Invalid user id '{}': expected a UUID",
                request.submitter_id
            ))
        })?;

        let product_name = request.product_name;
        if product_name.trim().is_empty() {
            return Err(AppError::Validation(
                "Product name cannot be empty".to_string(),
            ));
        }

        if !request.confidence.is_finite() {
            return Err(AppError::InvalidArgument(format!(
                "Confidence must be a finite number, got {}",
                request.confidence
            )));
        }

        let photo_write = match request.photo {
            Some(photo) => {
                validate_photo(&photo)?;
                let locator = photo_locator(user_id, &photo.file_name)?;
                store_photo(Arc::clone(&self.photos), locator, photo)
            }
            None => no_photo(),
        };

        let status = SubmissionStatus::decide(request.confidence);
        // Only a product that does not exist yet needs an SKU; the store
        // re-resolves by name inside its transaction
        let sku = match self.submissions.find_product_by_name(&product_name).await? {
            Some(existing) => existing.sku,
            None => resolve_sku(&product_name, request.manual_sku.as_deref()),
        };

        let outcome = self
            .submissions
            .record_intake(
                NewIntake {
                    user_id,
                    product_name,
                    sku,
                    status,
                    confidence: request.confidence,
                },
                photo_write,
            )
            .await?;

        if outcome.product_created {
            tracing::info!(
                "Product created from intake: name={}, sku={}",
                outcome.product.name,
                outcome.product.sku
            );
        }
        tracing::info!(
            "Submission recorded: id={}, user={}, product={}, status={}",
            outcome.submission.id,
            user_id,
            outcome.product.sku,
            outcome.submission.status
        );

        Ok(outcome.into())
    }
}

fn store_photo(photos: Arc<dyn PhotoStore>, locator: String, photo: PhotoUpload) -> PhotoWrite {
    Box::pin(async move {
        let content_type = photo
            .content_type
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let url = photos
            .put(&locator, photo.data, &content_type)
            .await
            .map_err(|e| {
                tracing::error!("Failed to store photo {}: {}", locator, e);
                e
            })?;
        Ok(Some(url))
    })
}

/// `<user id>_<final path component of the client file name>`
///
/// The same user uploading the same file name overwrites the earlier photo.
pub fn photo_locator(user_id: Uuid, file_name: &str) -> Result<String> {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base == "." || base == ".." {
        return Err(AppError::InvalidArgument(format!(
            "Invalid photo file name '{}'",
            file_name
        )));
    }

    Ok(format!("{}_{}", user_id, base))
}

fn validate_photo(photo: &PhotoUpload) -> Result<()> {
    if photo.data.is_empty() {
        return Err(AppError::InvalidArgument("Photo is empty".to_string()));
    }

    if photo.data.len() > MAX_PHOTO_SIZE {
        return Err(AppError::InvalidArgument(format!(
            "Photo too large. Maximum size is {} MB",
            MAX_PHOTO_SIZE / 1024 / 1024
        )));
    }

    if let Some(content_type) = &photo.content_type {
        if !ALLOWED_PHOTO_TYPES.contains(&content_type.as_str()) {
            return Err(AppError::InvalidArgument(format!(
                "Photo type '{}' is not allowed. Allowed types: {}",
                content_type,
                ALLOWED_PHOTO_TYPES.join(", ")
            )));
        }
    }

    Ok(())
}
