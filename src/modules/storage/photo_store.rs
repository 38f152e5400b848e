use async_trait::async_trait;

use crate::core::error::AppError;

/// Blob sink for submission photos
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Store `data` under `locator`, replacing any previous object with the
    /// same locator, and return the URL the photo is reachable at.
    ///
    /// `locator` is a single path segment (no separators).
    async fn put(&self, locator: &str, data: Vec<u8>, content_type: &str)
        -> Result<String, AppError>;
}

/// Reject locators that could escape the storage root
pub(crate) fn ensure_plain_segment(locator: &str) -> Result<(), AppError> {
    if locator.is_empty()
        || locator == "."
        || locator == ".."
        || locator.contains('/')
        || locator.contains('\\')
    {
        return Err(AppError::Internal(format!(
            "Refusing to store photo under locator '{}'",
            locator
        )));
    }
    Ok(())
}
