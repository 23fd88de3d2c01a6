use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::documents::dtos::DocumentResponseDto;
use crate::features::documents::keys::derive_key;
use crate::features::documents::models::{DocumentRecord, Visibility};
use crate::features::documents::policy::{authorize, can_access, Caller, Operation};
use crate::features::documents::repositories::DocumentRepository;
use crate::features::documents::rules::DocumentRules;
use crate::modules::storage::{BlobStore, BlobStoreError};

/// How an upload ended once the blob had been written
#[derive(Debug)]
pub enum UploadOutcome {
    /// Blob and record are both stored
    Committed(DocumentRecord),
    /// Record insert failed and the blob was removed again
    Compensated(AppError),
    /// Record insert failed and removing the blob failed too
    Orphaned {
        error: AppError,
        blob_key: String,
        compensation_error: BlobStoreError,
    },
}

impl UploadOutcome {
    /// Collapse to the caller-facing result; orphans surface the original error
    pub fn into_result(self) -> Result<DocumentRecord> {
        match self {
            UploadOutcome::Committed(record) => Ok(record),
            UploadOutcome::Compensated(error) => Err(error),
            UploadOutcome::Orphaned { error, .. } => Err(error),
        }
    }
}

/// Bytes and headers for a download
#[derive(Debug)]
pub struct DownloadedDocument {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub file_name: String,
}

/// Document orchestration over the metadata and blob stores
pub struct DocumentService {
    repository: Arc<dyn DocumentRepository>,
    blob_store: Arc<dyn BlobStore>,
    rules: DocumentRules,
}

impl DocumentService {
    pub fn new(
        repository: Arc<dyn DocumentRepository>,
        blob_store: Arc<dyn BlobStore>,
        rules: DocumentRules,
    ) -> Self {
        Self {
            repository,
            blob_store,
            rules,
        }
    }

    /// Validate, store and register an uploaded document
    pub async fn save_file(
        &self,
        data: Vec<u8>,
        display_name: &str,
        visibility: Visibility,
        content_type: Option<&str>,
        caller: &Caller,
    ) -> Result<DocumentResponseDto> {
        let record = self
            .save_file_saga(data, display_name, visibility, content_type, caller)
            .await?
            .into_result()?;

        Ok(record.into())
    }

    /// Upload as a two-step commit: blob first, then the record.
    ///
    /// Errors before the blob is written are returned directly; anything
    /// after that is reported through [`UploadOutcome`].
    pub async fn save_file_saga(
        &self,
        data: Vec<u8>,
        display_name: &str,
        visibility: Visibility,
        content_type: Option<&str>,
        caller: &Caller,
    ) -> Result<UploadOutcome> {
        let (display_name, extension) = self.rules.validate(display_name, data.len())?;
        authorize(caller, visibility, Operation::Write)?;

        let owner_id = caller
            .identity
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let record = DocumentRecord {
            id: Uuid::new_v4(),
            display_name,
            extension,
            visibility,
            owner_id,
            created_at: Utc::now(),
        };
        let key = derive_key(record.visibility, record.id, &record.display_name);

        let content_type = content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or_else(|| self.rules.mime_for(&record.extension));

        debug!("Uploading blob: key={}, size={}", key, data.len());
        self.blob_store.put(&key, &data, content_type).await?;

        let error = match self.repository.create(&record).await {
            Ok(_) => {
                info!(
                    "Document uploaded: id={}, name={}, visibility={}, owner={}",
                    record.id, record.display_name, record.visibility, record.owner_id
                );
                return Ok(UploadOutcome::Committed(record));
            }
            Err(e) => e,
        };

        debug!("Record insert failed, removing blob {}: {}", key, error);
        match self.blob_store.delete(&key).await {
            Ok(()) => Ok(UploadOutcome::Compensated(error)),
            Err(compensation_error) => {
                error!(
                    "Orphaned blob {}: record insert failed ({}) and blob removal failed ({})",
                    key, error, compensation_error
                );
                Ok(UploadOutcome::Orphaned {
                    error,
                    blob_key: key,
                    compensation_error,
                })
            }
        }
    }

    /// Fetch a document's bytes after the access check.
    ///
    /// `is_public_file` marks the anonymous endpoints, which only serve
    /// PUBLIC documents.
    pub async fn get_file(
        &self,
        id: Uuid,
        is_public_file: bool,
        caller: &Caller,
    ) -> Result<DownloadedDocument> {
        let record = self.find_record(id).await?;

        if is_public_file && record.visibility != Visibility::Public {
            return Err(AppError::Forbidden(format!(
                "Document {} is not public",
                id
            )));
        }
        authorize(caller, record.visibility, Operation::Read)?;

        let key = derive_key(record.visibility, record.id, &record.display_name);
        let bytes = self.blob_store.get(&key).await.map_err(|e| {
            if let BlobStoreError::NotFound(_) = e {
                warn!("Record {} has no blob at {}", record.id, key);
            }
            AppError::from(e)
        })?;

        debug!("Document read: id={}, size={}", record.id, bytes.len());

        Ok(DownloadedDocument {
            bytes,
            mime_type: self.rules.mime_for(&record.extension),
            file_name: record.display_name,
        })
    }

    /// Delete a document's blob, then its record
    pub async fn delete_file(&self, id: Uuid, caller: &Caller) -> Result<()> {
        let record = self.find_record(id).await?;
        authorize(caller, record.visibility, Operation::Delete)?;

        let key = derive_key(record.visibility, record.id, &record.display_name);
        match self.blob_store.delete(&key).await {
            Ok(()) => {}
            // Missing blob, or a concurrent delete got there first
            Err(BlobStoreError::NotFound(_)) => {
                warn!("Delete requested for record {} without blob {}", record.id, key);
                return Err(AppError::NotFound(format!("Document {} not found", id)));
            }
            Err(e) => return Err(e.into()),
        }

        match self.repository.delete_by_id(record.id).await {
            Ok(()) => {}
            Err(AppError::NotFound(_)) => {
                debug!("Record {} already removed after blob delete", record.id);
            }
            Err(e) => {
                error!(
                    "Dangling record {}: blob {} deleted but record removal failed: {}",
                    record.id, key, e
                );
                return Err(e);
            }
        }

        info!("Document deleted: id={}, name={}", record.id, record.display_name);
        Ok(())
    }

    /// All documents of one visibility tier
    pub async fn get_all(&self, visibility: Visibility) -> Result<Vec<DocumentResponseDto>> {
        let records = self.repository.find_all_by_visibility(visibility).await?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Documents whose display name contains `needle`
    pub async fn get_all_by_name(&self, needle: &str) -> Result<Vec<DocumentResponseDto>> {
        let records = self
            .repository
            .find_by_display_name_contains(needle.trim())
            .await?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Remove records whose blob no longer exists, returning their ids
    pub async fn reconcile(&self, caller: &Caller) -> Result<Vec<Uuid>> {
        authorize(caller, Visibility::Public, Operation::Delete)?;

        let mut removed = Vec::new();
        for record in self.repository.find_all().await? {
            let key = derive_key(record.visibility, record.id, &record.display_name);
            if !can_access(caller, record.visibility, Operation::Delete)
                || self.blob_store.exists(&key).await?
            {
                continue;
            }

            match self.repository.delete_by_id(record.id).await {
                Ok(()) => {
                    warn!("Removed dangling record {} (missing blob {})", record.id, key);
                    removed.push(record.id);
                }
                // Deleted concurrently
                Err(AppError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        info!("Reconciliation removed {} dangling record(s)", removed.len());
        Ok(removed)
    }

    async fn find_record(&self, id: Uuid) -> Result<DocumentRecord> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Document {} not found", id)))
    }
}
