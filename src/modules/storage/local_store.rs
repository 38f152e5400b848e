//! Local disk photo storage
//!
//! Photos land in a single directory which the router mounts as static files,
//! so the returned URL is a path on this service (e.g. `/uploads/<locator>`).

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::photo_store::{ensure_plain_segment, PhotoStore};
use crate::core::config::LocalStorageConfig;
use crate::core::error::AppError;

pub struct LocalPhotoStore {
    upload_dir: PathBuf,
    public_path: String,
}

impl LocalPhotoStore {
    /// Create the store, making sure the upload directory exists
    pub async fn new(config: LocalStorageConfig) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(&config.upload_dir)
            .await
            .map_err(|e| {
                AppError::Internal(format!(
                    "Failed to create upload directory '{}': {}",
                    config.upload_dir.display(),
                    e
                ))
            })?;

        info!(
            "Local photo storage ready at '{}' (served under {})",
            config.upload_dir.display(),
            config.public_path
        );

        Ok(Self {
            upload_dir: config.upload_dir,
            public_path: config.public_path,
        })
    }

    /// Directory the router should serve under `public_path`
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn public_path(&self) -> &str {
        &self.public_path
    }
}

#[async_trait]
impl PhotoStore for LocalPhotoStore {
    async fn put(
        &self,
        locator: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, AppError> {
        ensure_plain_segment(locator)?;

        let path = self.upload_dir.join(locator);
        tokio::fs::write(&path, &data).await.map_err(|e| {
            AppError::Internal(format!("Failed to write photo '{}': {}", path.display(), e))
        })?;

        debug!("Stored photo '{}' ({} bytes)", path.display(), data.len());
        Ok(format!("{}/{}", self.public_path, urlencoding::encode(locator)))
    }
}
