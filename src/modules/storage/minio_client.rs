//! MinIO/S3-compatible storage client
//!
//! Uses rust-s3 crate for lightweight S3 operations. The crate is built
//! without `fail-on-err`, so non-2xx responses come back as `Ok` and their
//! status codes are checked here.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, BucketConfiguration, Region};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{BlobResult, BlobStore, BlobStoreError};
use crate::core::config::MinIOConfig;
use crate::core::error::AppError;

const HTTP_NOT_FOUND: u16 = 404;

/// MinIO/S3-compatible storage client
pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
}

impl MinIOClient {
    /// Create a new MinIO client from configuration and make sure the bucket exists
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

        if let Some(secs) = config.request_timeout_secs {
            bucket.set_request_timeout(Some(Duration::from_secs(secs)));
        }

        let client = Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint,
        };

        client.ensure_bucket_exists().await?;

        info!(
            "MinIO client initialized for endpoint: {}, bucket: {}",
            client.endpoint,
            client.bucket.name()
        );

        Ok(client)
    }

    /// Ensure the bucket exists, create if not
    async fn ensure_bucket_exists(&self) -> Result<(), AppError> {
        let result = Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match result {
            Ok(response) if response.success() => {
                info!("Bucket '{}' created successfully", self.bucket.name());
                Ok(())
            }
            Ok(response) => {
                // 409 BucketAlreadyOwnedByYou is the usual answer on restart
                debug!(
                    "Bucket '{}' not created (status {}), assuming it exists",
                    self.bucket.name(),
                    response.response_code
                );
                Ok(())
            }
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                    || error_str.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                    Ok(())
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                    Ok(())
                }
            }
        }
    }

    /// Get the bucket name
    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }

    fn classify(key: &str, op: &str, err: S3Error) -> BlobStoreError {
        match err {
            S3Error::HttpFailWithBody(HTTP_NOT_FOUND, _) => BlobStoreError::NotFound(key.to_string()),
            other => BlobStoreError::Unavailable(format!("Failed to {} '{}': {}", op, key, other)),
        }
    }

    fn check_status(key: &str, op: &str, status: u16) -> BlobResult<()> {
        match status {
            200..=299 => Ok(()),
            HTTP_NOT_FOUND => Err(BlobStoreError::NotFound(key.to_string())),
            other => Err(BlobStoreError::Unavailable(format!(
                "Failed to {} '{}': HTTP {}",
                op, key, other
            ))),
        }
    }
}

#[async_trait]
impl BlobStore for MinIOClient {
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> BlobResult<()> {
        let response = self
            .bucket
            .put_object_with_content_type(key, data, content_type)
            .await
            .map_err(|e| Self::classify(key, "upload", e))?;

        Self::check_status(key, "upload", response.status_code())?;

        debug!(
            "Uploaded '{}' ({} bytes) to bucket '{}'",
            key,
            data.len(),
            self.bucket.name()
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> BlobResult<Vec<u8>> {
        let response = self
            .bucket
            .get_object(key)
            .await
            .map_err(|e| Self::classify(key, "download", e))?;

        Self::check_status(key, "download", response.status_code())?;

        debug!("Downloaded '{}' from bucket '{}'", key, self.bucket.name());
        Ok(response.to_vec())
    }

    async fn exists(&self, key: &str) -> BlobResult<bool> {
        match self.bucket.head_object(key).await {
            Ok((_, status)) => match Self::check_status(key, "inspect", status) {
                Ok(()) => Ok(true),
                Err(BlobStoreError::NotFound(_)) => Ok(false),
                Err(e) => Err(e),
            },
            Err(e) => match Self::classify(key, "inspect", e) {
                BlobStoreError::NotFound(_) => Ok(false),
                other => Err(other),
            },
        }
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        // S3 deletes are idempotent, so absence has to be checked explicitly
        if !self.exists(key).await? {
            return Err(BlobStoreError::NotFound(key.to_string()));
        }

        let response = self
            .bucket
            .delete_object(key)
            .await
            .map_err(|e| Self::classify(key, "delete", e))?;

        Self::check_status(key, "delete", response.status_code())?;

        debug!("Deleted '{}' from bucket '{}'", key, self.bucket.name());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_status() {
        assert!(MinIOClient::check_status("k", "get", 200).is_ok());
        assert!(MinIOClient::check_status("k", "delete", 204).is_ok());
        assert!(matches!(
            MinIOClient::check_status("k", "get", 404),
            Err(BlobStoreError::NotFound(ref k)) if k == "k"
        ));
        assert!(matches!(
            MinIOClient::check_status("k", "get", 503),
            Err(BlobStoreError::Unavailable(_))
        ));
        assert!(matches!(
            MinIOClient::check_status("k", "get", 403),
            Err(BlobStoreError::Unavailable(_))
        ));
    }

    #[test]
    fn test_classify_http_errors() {
        let err = S3Error::HttpFailWithBody(404, "NoSuchKey".to_string());
        assert!(matches!(
            MinIOClient::classify("public/x", "get", err),
            BlobStoreError::NotFound(_)
        ));

        let err = S3Error::HttpFailWithBody(500, "InternalError".to_string());
        assert!(matches!(
            MinIOClient::classify("public/x", "get", err),
            BlobStoreError::Unavailable(_)
        ));
    }
}
