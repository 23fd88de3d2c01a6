//! Blob storage for document payloads
//!
//! Documents are stored in a MinIO/S3-compatible bucket under keys derived
//! from their metadata. The [`BlobStore`] trait is the seam the document
//! service talks to; [`MinIOClient`] is the production implementation.

use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
mod memory;
mod minio_client;

#[cfg(test)]
pub use memory::InMemoryBlobStore;
pub use minio_client::MinIOClient;

/// Blob storage errors
#[derive(Debug, Error)]
pub enum BlobStoreError {
    /// No object under the given key
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Transport or service failure; the caller may retry
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type BlobResult<T> = Result<T, BlobStoreError>;

/// Byte storage keyed by derived storage keys.
///
/// Implementations never retry internally.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `key`, replacing any existing object
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> BlobResult<()>;

    /// Fetch the object under `key`; `NotFound` if absent
    async fn get(&self, key: &str) -> BlobResult<Vec<u8>>;

    /// Whether an object exists under `key`; never fails with `NotFound`
    async fn exists(&self, key: &str) -> BlobResult<bool>;

    /// Remove the object under `key`; `NotFound` if absent
    async fn delete(&self, key: &str) -> BlobResult<()>;
}
