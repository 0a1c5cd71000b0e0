//! REST object storage adapter
//!
//! Uploads objects to the hosted storage service's object API and derives the
//! public URL from the configured public base.

use crate::adapters::storage::ObjectStorage;
use crate::config::schema::StorageConfig;
use crate::domain::errors::StorageError;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Object storage adapter over the hosted storage HTTP API
pub struct RestStorage {
    base_url: String,
    public_base_url: String,
    bucket: String,
    api_key: String,
    client: Client,
}

impl RestStorage {
    /// Create a new adapter from configuration
    pub fn new(config: StorageConfig) -> Self {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            api_key: config.api_key,
            client,
        }
    }

    /// The public URL an object name resolves to
    pub fn public_url(&self, name: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, self.bucket, name)
    }
}

#[async_trait]
impl ObjectStorage for RestStorage {
    async fn upload(
        &self,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, name);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", content_type)
            // Same name overwrites: the pointer stays stable across regenerations.
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::ServerError {
                status: status.as_u16(),
                message: body,
            });
        }

        let public_url = self.public_url(name);
        tracing::debug!(name = %name, url = %public_url, "Uploaded object");
        Ok(public_url)
    }
}
