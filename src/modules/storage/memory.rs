//! In-memory blob store with fault injection for tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::{BlobResult, BlobStore, BlobStoreError};

#[derive(Default)]
pub struct InMemoryBlobStore {
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
    fail_put: AtomicBool,
    fail_get: AtomicBool,
    fail_delete: AtomicBool,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put` fail with `Unavailable`
    pub fn fail_puts(&self, fail: bool) {
        self.fail_put.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `get` fail with `Unavailable`
    pub fn fail_gets(&self, fail: bool) {
        self.fail_get.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `delete` fail with `Unavailable`
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    /// Remove an object directly, bypassing fault injection
    pub fn remove(&self, key: &str) {
        self.objects.lock().unwrap().remove(key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|(_, ct)| ct.clone())
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> BlobResult<()> {
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(BlobStoreError::Unavailable("injected put failure".into()));
        }
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (data.to_vec(), content_type.to_string()));
        Ok(())
    }

    async fn get(&self, key: &str) -> BlobResult<Vec<u8>> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(BlobStoreError::Unavailable("injected get failure".into()));
        }
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|(data, _)| data.clone())
            .ok_or_else(|| BlobStoreError::NotFound(key.to_string()))
    }

    async fn exists(&self, key: &str) -> BlobResult<bool> {
        Ok(self.contains(key))
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(BlobStoreError::Unavailable("injected delete failure".into()));
        }
        self.objects
            .lock()
            .unwrap()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| BlobStoreError::NotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_semantics() {
        let store = InMemoryBlobStore::new();

        assert!(!store.exists("student/nope").await.unwrap());
        assert!(matches!(
            store.get("student/nope").await,
            Err(BlobStoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete("student/nope").await,
            Err(BlobStoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = InMemoryBlobStore::new();
        store
            .put("public/1-a.txt", b"hello", "text/plain")
            .await
            .unwrap();

        assert_eq!(store.get("public/1-a.txt").await.unwrap(), b"hello");
        assert_eq!(
            store.content_type("public/1-a.txt").as_deref(),
            Some("text/plain")
        );

        store.delete("public/1-a.txt").await.unwrap();
        assert!(!store.exists("public/1-a.txt").await.unwrap());
    }
}
