use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use super::DocumentRepository;
use crate::core::error::{AppError, Result};
use crate::features::documents::models::{DocumentRecord, Visibility};

/// In-memory metadata store with fault injection, for tests
#[derive(Default)]
pub struct InMemoryDocumentRepository {
    records: Mutex<Vec<DocumentRecord>>,
    case_sensitive_search: bool,
    fail_create_duplicate: AtomicBool,
    fail_create: AtomicBool,
    fail_delete: AtomicBool,
    fail_delete_not_found: AtomicBool,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn case_sensitive() -> Self {
        Self {
            case_sensitive_search: true,
            ..Self::default()
        }
    }

    /// Make every `create` fail with `DuplicateName`
    pub fn fail_creates_as_duplicate(&self, fail: bool) {
        self.fail_create_duplicate.store(fail, Ordering::SeqCst);
    }

    /// Make every `create` fail with a database-style error
    pub fn fail_creates(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    /// Make every `delete_by_id` report `NotFound`, as if the row were
    /// removed concurrently. The record itself is dropped.
    pub fn fail_deletes_as_not_found(&self, fail: bool) {
        self.fail_delete_not_found.store(fail, Ordering::SeqCst);
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn newest_first(mut records: Vec<DocumentRecord>) -> Vec<DocumentRecord> {
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn create(&self, record: &DocumentRecord) -> Result<Uuid> {
        if self.fail_create_duplicate.load(Ordering::SeqCst) {
            return Err(AppError::DuplicateName(format!(
                "A document named '{}' already exists",
                record.display_name
            )));
        }
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(AppError::Internal("injected create failure".to_string()));
        }

        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.display_name == record.display_name) {
            return Err(AppError::DuplicateName(format!(
                "A document named '{}' already exists",
                record.display_name
            )));
        }
        records.push(record.clone());
        Ok(record.id)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DocumentRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_display_name_contains(&self, needle: &str) -> Result<Vec<DocumentRecord>> {
        let records = self.records.lock().unwrap();
        let matches = if self.case_sensitive_search {
            records
                .iter()
                .filter(|r| r.display_name.contains(needle))
                .cloned()
                .collect()
        } else {
            let needle = needle.to_lowercase();
            records
                .iter()
                .filter(|r| r.display_name.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        };
        Ok(Self::newest_first(matches))
    }

    async fn find_all_by_visibility(&self, visibility: Visibility) -> Result<Vec<DocumentRecord>> {
        let records = self.records.lock().unwrap();
        Ok(Self::newest_first(
            records
                .iter()
                .filter(|r| r.visibility == visibility)
                .cloned()
                .collect(),
        ))
    }

    async fn find_all(&self) -> Result<Vec<DocumentRecord>> {
        let records = self.records.lock().unwrap();
        Ok(Self::newest_first(records.clone()))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(AppError::Internal("injected delete failure".to_string()));
        }

        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before || self.fail_delete_not_found.load(Ordering::SeqCst) {
            return Err(AppError::NotFound(format!("Document {} not found", id)));
        }
        Ok(())
    }
}
