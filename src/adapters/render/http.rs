//! HTTP render service adapter
//!
//! POSTs the report document as JSON to the render service and receives the
//! PDF bytes back.

use crate::adapters::render::ReportRenderer;
use crate::config::schema::ReportingConfig;
use crate::domain::errors::RenderError;
use crate::reporting::document::ReportDocument;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Renderer adapter over an HTTP render service
pub struct HttpRenderer {
    render_url: String,
    client: Client,
}

impl HttpRenderer {
    /// Create a new adapter from configuration
    pub fn new(config: &ReportingConfig) -> Self {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.render_timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            render_url: config.render_url.clone(),
            client,
        }
    }
}

#[async_trait]
impl ReportRenderer for HttpRenderer {
    async fn render(&self, document: &ReportDocument) -> Result<Vec<u8>, RenderError> {
        let response = self
            .client
            .post(&self.render_url)
            .json(document)
            .send()
            .await
            .map_err(|e| RenderError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RenderError::RenderFailed(format!("{status}: {body}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RenderError::RenderFailed(e.to_string()))?;

        tracing::debug!(
            request_id = %document.request_id,
            size = bytes.len(),
            "Rendered report document"
        );

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_document() -> ReportDocument {
        ReportDocument {
            request_id: "req-1".to_string(),
            patient_id: "MRN-42".to_string(),
            gene: "CYP2D6".to_string(),
            specimen: "EDTA whole blood".to_string(),
            genotype: "*1/*41".to_string(),
            phenotype: "Intermediate Metabolizer".to_string(),
            activity_score: 1.25,
            genotype_summary: String::new(),
            recommendation: String::new(),
            clinic_name: "Example PGx Laboratory".to_string(),
            clinic_address: "1 Lab Way".to_string(),
            issued_at: Utc::now(),
            confirmers: Vec::new(),
        }
    }

    fn renderer_for(url: &str) -> HttpRenderer {
        HttpRenderer::new(&ReportingConfig {
            render_url: url.to_string(),
            render_timeout_seconds: 5,
            clinic_name: "Example PGx Laboratory".to_string(),
            clinic_address: "1 Lab Way".to_string(),
        })
    }

    #[tokio::test]
    async fn test_render_success() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/render")
            .with_status(200)
            .with_header("content-type", "application/pdf")
            .with_body("%PDF-1.7 fake")
            .create_async()
            .await;

        let renderer = renderer_for(&format!("{}/render", server.url()));
        let bytes = renderer.render(&sample_document()).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_render_failure_maps_to_render_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/render")
            .with_status(422)
            .with_body("missing template")
            .create_async()
            .await;

        let renderer = renderer_for(&format!("{}/render", server.url()));
        let result = renderer.render(&sample_document()).await;
        assert!(matches!(result, Err(RenderError::RenderFailed(_))));
    }
}
