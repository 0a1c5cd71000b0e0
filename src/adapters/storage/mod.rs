//! Object storage adapters
//!
//! Rendered report PDFs are uploaded under a deterministic name per request,
//! so re-uploads overwrite in place (upsert semantics) and the public URL
//! stays stable across regenerations.

pub mod memory;
pub mod rest;

pub use memory::InMemoryStorage;
pub use rest::RestStorage;

use crate::domain::errors::StorageError;
use async_trait::async_trait;

/// Object storage collaborator
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload an object, returning its public URL
    ///
    /// Uploading the same name again must overwrite the existing object.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage service is unreachable or rejects the
    /// upload.
    async fn upload(
        &self,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;
}
