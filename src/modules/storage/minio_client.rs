//! MinIO/S3-compatible photo storage client
//!
//! Uses rust-s3 crate for lightweight S3 operations. Photos are written under
//! the public prefix; the bucket policy must allow anonymous reads there.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};

use super::photo_store::{ensure_plain_segment, PhotoStore};
use crate::core::config::MinIOConfig;
use crate::core::error::AppError;

/// Folder under the public prefix holding submission photos
const PHOTO_FOLDER: &str = "submissions";

/// MinIO/S3-compatible storage client
pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    public_endpoint: String,
    public_prefix: String,
}

impl MinIOClient {
    /// Create a new MinIO client from configuration
    pub async fn new(config: MinIOConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create MinIO bucket: {}", e)))?;

        // Use path-style URLs for MinIO (http://endpoint/bucket instead of http://bucket.endpoint)
        bucket.set_path_style();

        let client = Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint,
            public_endpoint: config.public_endpoint,
            public_prefix: config.public_prefix,
        };

        info!(
            "MinIO client initialized for endpoint: {}, bucket: {}, public_prefix: {}",
            client.endpoint,
            client.bucket.name(),
            client.public_prefix
        );

        Ok(client)
    }

    /// Ensure the bucket exists, create if not
    pub async fn ensure_bucket_exists(&self) -> Result<(), AppError> {
        let bucket_config = BucketConfiguration::default();

        match Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            bucket_config,
        )
        .await
        {
            Ok(_) => {
                info!("Bucket '{}' created successfully", self.bucket.name());
                Ok(())
            }
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                    || error_str.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                }
                Ok(())
            }
        }
    }

    /// Object key for a photo locator (e.g. "public/submissions/<locator>")
    pub fn photo_key(&self, locator: &str) -> String {
        format!("{}/{}/{}", self.public_prefix, PHOTO_FOLDER, locator)
    }

    /// Public URL of an object key
    pub fn get_file_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_endpoint, self.bucket.name(), key)
    }

    /// Public URL of a stored photo, with the locator percent-encoded
    pub fn photo_url(&self, locator: &str) -> String {
        self.get_file_url(&self.photo_key(&urlencoding::encode(locator)))
    }

    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }
}

#[async_trait]
impl PhotoStore for MinIOClient {
    async fn put(
        &self,
        locator: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        ensure_plain_segment(locator)?;

        let key = self.photo_key(locator);
        self.bucket
            .put_object_with_content_type(&key, &data, content_type)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to upload photo '{}': {}", key, e)))?;

        debug!("Uploaded photo '{}' to bucket '{}'", key, self.bucket.name());
        Ok(self.photo_url(locator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MinIOConfig {
        MinIOConfig {
            endpoint: "http://minio:9000".to_string(),
            public_endpoint: "https://cdn.example.com".to_string(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            bucket: "circularapp-photos".to_string(),
            region: "us-east-1".to_string(),
            public_prefix: "public".to_string(),
        }
    }

    #[tokio::test]
    async fn test_photo_urls_use_public_endpoint() {
        let client = MinIOClient::new(config()).await.unwrap();

        let key = client.photo_key("u1_photo.jpg");
        assert_eq!(key, "public/submissions/u1_photo.jpg");
        assert_eq!(
            client.get_file_url(&key),
            "https://cdn.example.com/circularapp-photos/public/submissions/u1_photo.jpg"
        );
        assert_eq!(
            client.photo_url("u1_mi foto#1.jpg"),
            "https://cdn.example.com/circularapp-photos/public/submissions/u1_mi%20foto%231.jpg"
        );
    }
}
