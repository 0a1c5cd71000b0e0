//! HTTP client for the hosted datastore's row API
//!
//! Thin wrapper around reqwest that owns authentication headers, timeouts,
//! retry with exponential backoff for reads, and the mapping from HTTP
//! failures to [`DatastoreError`].

use crate::config::schema::DatastoreConfig;
use crate::domain::errors::DatastoreError;
use reqwest::{Client, ClientBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Row API client
///
/// Every table lives under `rest/v1/<table>`; filters are query-string
/// operators (`id=eq.x`, `confirmed_by_1=is.null`). Writes ask the server to
/// return the affected rows so conditional updates can distinguish "applied"
/// from "precondition failed" by row count.
pub struct DatastoreClient {
    base_url: String,
    api_key: String,
    client: Client,
    config: DatastoreConfig,
}

impl DatastoreClient {
    /// Create a new client from configuration
    pub fn new(config: DatastoreConfig) -> Self {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            base_url,
            api_key: config.api_key.clone(),
            client,
            config,
        }
    }

    /// The configured base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn row_url(&self, table_and_query: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table_and_query)
    }

    fn map_send_error(e: reqwest::Error) -> DatastoreError {
        if e.is_timeout() {
            DatastoreError::Timeout(e.to_string())
        } else {
            DatastoreError::ConnectionFailed(e.to_string())
        }
    }

    async fn check_status(response: Response) -> Result<Response, DatastoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(
                DatastoreError::AuthenticationFailed(format!("{status}: {body}")),
            ),
            s if s.is_client_error() => Err(DatastoreError::ClientError {
                status: s.as_u16(),
                message: body,
            }),
            s => Err(DatastoreError::ServerError {
                status: s.as_u16(),
                message: body,
            }),
        }
    }

    /// Retry a read with exponential backoff
    async fn retry_request<F, T, Fut>(&self, operation: F) -> Result<T, DatastoreError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, DatastoreError>>,
    {
        let max_retries = self.config.retry.max_retries;
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;
                    if attempt >= max_retries {
                        return Err(e);
                    }

                    let delay_ms = self.config.retry.initial_delay_ms
                        * (self
                            .config
                            .retry
                            .backoff_multiplier
                            .powf((attempt - 1) as f64) as u64);
                    let delay_ms = delay_ms.min(self.config.retry.max_delay_ms);

                    tracing::warn!(
                        attempt = attempt,
                        max_retries = max_retries,
                        delay_ms = delay_ms,
                        error = %e,
                        "Retrying datastore read after error"
                    );

                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }

    /// Fetch rows matching a filtered table query
    ///
    /// # Arguments
    ///
    /// * `table_and_query` - table name plus filter string, e.g.
    ///   `test_requests?id=eq.req-1&select=*`
    pub async fn get_rows<T: DeserializeOwned>(
        &self,
        table_and_query: &str,
    ) -> Result<Vec<T>, DatastoreError> {
        let url = self.row_url(table_and_query);

        self.retry_request(|| async {
            let response = self
                .client
                .get(&url)
                .header("apikey", &self.api_key)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .send()
                .await
                .map_err(Self::map_send_error)?;

            let response = Self::check_status(response).await?;
            response
                .json::<Vec<T>>()
                .await
                .map_err(|e| DatastoreError::InvalidResponse(e.to_string()))
        })
        .await
    }

    /// Insert a row, returning the persisted representation
    pub async fn insert_row<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<T, DatastoreError> {
        let url = self.row_url(table);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let response = Self::check_status(response).await?;
        let mut rows: Vec<T> = response
            .json()
            .await
            .map_err(|e| DatastoreError::InvalidResponse(e.to_string()))?;

        rows.pop().ok_or_else(|| {
            DatastoreError::InvalidResponse("Insert returned no rows".to_string())
        })
    }

    /// Apply a filtered update, returning the affected rows
    ///
    /// An empty result means the filter matched nothing - for conditional
    /// updates, that the asserted prior state no longer held.
    pub async fn patch_rows<B: Serialize, T: DeserializeOwned>(
        &self,
        table_and_query: &str,
        body: &B,
    ) -> Result<Vec<T>, DatastoreError> {
        let url = self.row_url(table_and_query);

        let response = self
            .client
            .patch(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let response = Self::check_status(response).await?;
        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| DatastoreError::InvalidResponse(e.to_string()))
    }
}
