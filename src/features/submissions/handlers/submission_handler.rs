use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::submissions::dtos::{
    StatusUpdatedDto, SubmissionResponseDto, SubmissionResultDto, SubmitReturnForm,
    UpdateStatusDto,
};
use crate::features::submissions::services::{
    IntakeService, LedgerService, PhotoUpload, SubmitReturn,
};
use crate::shared::types::{ApiResponse, Meta};

/// Submit a returned item
///
/// Accepts multipart/form-data with:
/// - `product`: product name from the classifier (required)
/// - `confidence`: classifier confidence (required)
/// - `user_id`: submitting user's id (required)
/// - `manual_sku`: SKU to assign if the product is new (optional)
/// - `photo`: photo of the item (optional)
#[utoipa::path(
    post,
    path = "/api/submissions",
    tag = "submissions",
    request_body(
        content = SubmitReturnForm,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 201, description = "Submission recorded", body = ApiResponse<SubmissionResultDto>),
        (status = 400, description = "Invalid argument, validation error or SKU collision"),
        (status = 404, description = "User not found"),
        (status = 413, description = "Photo too large")
    )
)]
pub async fn submit_return(
    State(service): State<Arc<IntakeService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<SubmissionResultDto>>)> {
    let mut product: Option<String> = None;
    let mut confidence: Option<String> = None;
    let mut user_id: Option<String> = None;
    let mut manual_sku: Option<String> = None;
    let mut photo: Option<PhotoUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "photo" => {
                let content_type = field.content_type().map(|s| s.to_string());
                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "photo".to_string());
                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read photo bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read photo data: {}", e))
                })?;

                // Browsers send an empty part when no file was picked
                if !data.is_empty() {
                    photo = Some(PhotoUpload {
                        file_name,
                        content_type,
                        data: data.to_vec(),
                    });
                }
            }
            "product" | "confidence" | "user_id" | "manual_sku" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read {} field: {}", field_name, e))
                })?;
                match field_name.as_str() {
                    "product" => product = Some(text),
                    "confidence" => confidence = Some(text),
                    "user_id" => user_id = Some(text),
                    _ => manual_sku = Some(text),
                }
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let product =
        product.ok_or_else(|| AppError::BadRequest("Field 'product' is required".to_string()))?;
    let confidence = confidence
        .ok_or_else(|| AppError::BadRequest("Field 'confidence' is required".to_string()))?;
    let user_id =
        user_id.ok_or_else(|| AppError::BadRequest("Field 'user_id' is required".to_string()))?;

    let confidence = confidence.trim().parse::<f64>().map_err(|_| {
        AppError::InvalidArgument(format!("Confidence '{}' is not a number", confidence))
    })?;

    let result = service
        .submit_return(SubmitReturn {
            product_name: product,
            confidence,
            submitter_id: user_id,
            manual_sku,
            photo,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(result),
            Some("Submission recorded".to_string()),
            None,
        )),
    ))
}

/// List every submission, newest first
#[utoipa::path(
    get,
    path = "/api/submissions",
    responses(
        (status = 200, description = "Submission ledger", body = ApiResponse<Vec<SubmissionResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn list_submissions(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<LedgerService>>,
) -> Result<Json<ApiResponse<Vec<SubmissionResponseDto>>>> {
    let submissions = service.list_all().await?;
    let meta = Meta::total(submissions.len());
    Ok(Json(ApiResponse::success(Some(submissions), None, Some(meta))))
}

/// List the caller's own submissions
#[utoipa::path(
    get,
    path = "/api/submissions/mine",
    responses(
        (status = 200, description = "Caller's submissions", body = ApiResponse<Vec<SubmissionResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn list_my_submissions(
    user: AuthenticatedUser,
    State(service): State<Arc<LedgerService>>,
) -> Result<Json<ApiResponse<Vec<SubmissionResponseDto>>>> {
    let submissions = service.list_for_user(user.user_id).await?;
    let meta = Meta::total(submissions.len());
    Ok(Json(ApiResponse::success(Some(submissions), None, Some(meta))))
}

/// Get submission by ID
#[utoipa::path(
    get,
    path = "/api/submissions/{id}",
    params(
        ("id" = Uuid, Path, description = "Submission ID")
    ),
    responses(
        (status = 200, description = "Submission found", body = ApiResponse<SubmissionResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Submission not found")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn get_submission(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<LedgerService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SubmissionResponseDto>>> {
    let submission = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(submission), None, None)))
}

/// Override a submission's status
#[utoipa::path(
    put,
    path = "/api/submissions/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Submission ID")
    ),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<StatusUpdatedDto>),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Submission not found")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn update_submission_status(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<LedgerService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateStatusDto>,
) -> Result<Json<ApiResponse<StatusUpdatedDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    debug!("Admin {} setting submission {} to {}", admin.email, id, dto.status);
    let updated = service.update_status(id, &dto.status).await?;
    Ok(Json(ApiResponse::success(
        Some(updated),
        Some("Status updated successfully".to_string()),
        None,
    )))
}
