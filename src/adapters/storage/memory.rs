//! In-memory object storage
//!
//! Keeps uploaded objects in a map; used by tests, including the failure
//! injection the confirmation side-effect tests rely on.

use crate::adapters::storage::ObjectStorage;
use crate::domain::errors::StorageError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// In-memory implementation of [`ObjectStorage`]
#[derive(Default)]
pub struct InMemoryStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    fail_uploads: AtomicBool,
}

impl InMemoryStorage {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent upload fail (or succeed again)
    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Fetch a stored object's bytes
    pub async fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.objects.lock().await.get(name).cloned()
    }

    /// Number of stored objects
    pub async fn object_count(&self) -> usize {
        self.objects.lock().await.len()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryStorage {
    async fn upload(
        &self,
        name: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed {
                name: name.to_string(),
                message: "injected upload failure".to_string(),
            });
        }

        self.objects.lock().await.insert(name.to_string(), bytes);
        Ok(format!("memory://{name}"))
    }
}
