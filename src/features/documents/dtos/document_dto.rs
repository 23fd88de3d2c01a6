use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::documents::models::{DocumentRecord, Visibility};

/// Upload document request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct UploadDocumentDto {
    /// The file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub document: String,
    /// Display name, including the extension
    #[schema(example = "Week 3 notes.pdf")]
    pub file_name: String,
    /// Visibility tier: PUBLIC, STUDENT or TEACHER
    #[schema(example = "STUDENT")]
    pub file_type: String,
}

/// Public projection of a document record
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponseDto {
    pub id: Uuid,
    pub file_name: String,
    pub file_extension: String,
    pub file_type: Visibility,
    pub created_at: DateTime<Utc>,
}

impl From<DocumentRecord> for DocumentResponseDto {
    fn from(record: DocumentRecord) -> Self {
        Self {
            id: record.id,
            file_name: record.display_name,
            file_extension: record.extension,
            file_type: record.visibility,
            created_at: record.created_at,
        }
    }
}

/// Name search query
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Substring of the display name; empty matches everything
    #[serde(default)]
    pub file_name: String,
}

/// Result of a reconciliation sweep
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileResponseDto {
    /// Ids of records removed because their blob was missing
    pub removed_ids: Vec<Uuid>,
}
