use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::{self, AppError};
use crate::features::products::models::Product;
use crate::shared::constants::APPROVAL_THRESHOLD;

/// Review state matching the `submission_status` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "submission_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Pendiente,
    Aprobado,
    Rechazado,
}

impl SubmissionStatus {
    /// Approve strictly above the threshold; 0.65 itself is rejected
    pub fn decide(confidence: f64) -> Self {
        if confidence > APPROVAL_THRESHOLD {
            SubmissionStatus::Aprobado
        } else {
            SubmissionStatus::Rechazado
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Pendiente => write!(f, "pendiente"),
            SubmissionStatus::Aprobado => write!(f, "aprobado"),
            SubmissionStatus::Rechazado => write!(f, "rechazado"),
        }
    }
}

impl FromStr for SubmissionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pendiente" => Ok(SubmissionStatus::Pendiente),
            "aprobado" => Ok(SubmissionStatus::Aprobado),
            "rechazado" => Ok(SubmissionStatus::Rechazado),
            other => Err(AppError::InvalidArgument(format!(
                "Unknown status '{}'. Allowed values: pendiente, aprobado, rechazado",
                other
            ))),
        }
    }
}

/// Database model for submission
#[derive(Debug, Clone, FromRow)]
pub struct Submission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub status: SubmissionStatus,
    pub returned_quantity: i32,
    pub photo_url: Option<String>,
    /// Stored as supplied, never clamped
    pub confidence: f64,
}

/// Submission joined with its product, as read from the ledger query
#[derive(Debug, Clone, FromRow)]
pub struct SubmissionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub status: SubmissionStatus,
    pub returned_quantity: i32,
    pub photo_url: Option<String>,
    pub confidence: f64,
    pub product_name: String,
    pub product_sku: String,
    pub product_description: Option<String>,
    pub product_created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SubmissionWithProduct {
    pub submission: Submission,
    pub product: Product,
}

impl From<SubmissionRow> for SubmissionWithProduct {
    fn from(row: SubmissionRow) -> Self {
        Self {
            product: Product {
                id: row.product_id,
                name: row.product_name,
                sku: row.product_sku,
                description: row.product_description,
                created_at: row.product_created_at,
            },
            submission: Submission {
                id: row.id,
                user_id: row.user_id,
                product_id: row.product_id,
                submitted_at: row.submitted_at,
                status: row.status,
                returned_quantity: row.returned_quantity,
                photo_url: row.photo_url,
                confidence: row.confidence,
            },
        }
    }
}

/// Everything the store needs to record one return
#[derive(Debug, Clone)]
pub struct NewIntake {
    pub user_id: Uuid,
    pub product_name: String,
    /// Used only if no product with `product_name` exists yet
    pub sku: String,
    pub status: SubmissionStatus,
    pub confidence: f64,
}

/// Photo write deferred until the product and submitter are settled
///
/// Resolves to the stored photo URL, or `None` when no photo was sent.
pub type PhotoWrite = Pin<Box<dyn Future<Output = error::Result<Option<String>>> + Send>>;

/// A `PhotoWrite` for intakes without a photo
pub fn no_photo() -> PhotoWrite {
    Box::pin(async { Ok(None) })
}

#[derive(Debug, Clone)]
pub struct IntakeOutcome {
    pub submission: Submission,
    pub product: Product,
    pub product_created: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_threshold_is_strict() {
        assert_eq!(SubmissionStatus::decide(0.9), SubmissionStatus::Aprobado);
        assert_eq!(SubmissionStatus::decide(0.6501), SubmissionStatus::Aprobado);
        assert_eq!(SubmissionStatus::decide(0.65), SubmissionStatus::Rechazado);
        assert_eq!(SubmissionStatus::decide(0.0), SubmissionStatus::Rechazado);
        assert_eq!(SubmissionStatus::decide(-1.0), SubmissionStatus::Rechazado);
        assert_eq!(SubmissionStatus::decide(1.5), SubmissionStatus::Aprobado);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            "APROBADO".parse::<SubmissionStatus>().unwrap(),
            SubmissionStatus::Aprobado
        );
        assert_eq!(
            " pendiente ".parse::<SubmissionStatus>().unwrap(),
            SubmissionStatus::Pendiente
        );
        assert!(matches!(
            "archivado".parse::<SubmissionStatus>(),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SubmissionStatus::Rechazado).unwrap(),
            "\"rechazado\""
        );
        assert_eq!(SubmissionStatus::Aprobado.to_string(), "aprobado");
    }
}
