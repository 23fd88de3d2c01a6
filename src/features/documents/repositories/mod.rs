//! Document metadata persistence

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::documents::models::{DocumentRecord, Visibility};

#[cfg(test)]
mod memory;
mod pg_document_repository;

#[cfg(test)]
pub use memory::InMemoryDocumentRepository;
pub use pg_document_repository::PgDocumentRepository;

/// Metadata store for document records.
///
/// Every operation is a single atomic statement against the backing store.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Insert a record; `DuplicateName` if the display name is taken
    async fn create(&self, record: &DocumentRecord) -> Result<Uuid>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DocumentRecord>>;

    /// Records whose display name contains `needle`, newest first
    async fn find_by_display_name_contains(&self, needle: &str) -> Result<Vec<DocumentRecord>>;

    /// Records of one visibility tier, newest first
    async fn find_all_by_visibility(&self, visibility: Visibility) -> Result<Vec<DocumentRecord>>;

    async fn find_all(&self) -> Result<Vec<DocumentRecord>>;

    /// Remove a record; `NotFound` if no record has this id
    async fn delete_by_id(&self, id: Uuid) -> Result<()>;
}
