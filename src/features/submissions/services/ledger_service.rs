use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::submissions::dtos::{StatusUpdatedDto, SubmissionResponseDto};
use crate::features::submissions::models::SubmissionStatus;
use crate::features::submissions::repositories::SubmissionRepository;

/// Service for reviewing recorded submissions
pub struct LedgerService {
    submissions: Arc<dyn SubmissionRepository>,
}

impl LedgerService {
    pub fn new(submissions: Arc<dyn SubmissionRepository>) -> Self {
        Self { submissions }
    }

    /// Every submission with its product, newest first
    pub async fn list_all(&self) -> Result<Vec<SubmissionResponseDto>> {
        let entries = self.submissions.list_all().await?;
        Ok(entries.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<SubmissionResponseDto> {
        self.submissions
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Submission '{}' not found", id)))
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<SubmissionResponseDto>> {
        let entries = self.submissions.list_for_user(user_id).await?;
        Ok(entries.into_iter().map(Into::into).collect())
    }

    /// Override the recorded decision
    ///
    /// Any transition between the three states is allowed.
    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<StatusUpdatedDto> {
        let status = status.parse::<SubmissionStatus>().map_err(|e| {
            tracing::debug!("Rejected status update for {}: {}", id, e);
            e
        })?;

        if !self.submissions.update_status(id, status).await? {
            return Err(AppError::NotFound(format!("Submission '{}' not found", id)));
        }

        tracing::info!("Submission status updated: id={}, status={}", id, status);
        Ok(StatusUpdatedDto { id, status })
    }
}
