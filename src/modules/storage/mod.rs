//! Storage module for submission photos
//!
//! `PhotoStore` is the seam the intake workflow writes through. Two backends
//! implement it: local disk (served back under a URL path) and MinIO/S3.

mod local_store;
mod minio_client;
mod photo_store;

pub use local_store::LocalPhotoStore;
pub use minio_client::MinIOClient;
pub use photo_store::PhotoStore;
