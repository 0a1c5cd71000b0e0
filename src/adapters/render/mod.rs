//! Report renderer adapters
//!
//! PDF typesetting is an external collaborator consumed through the
//! [`ReportRenderer`] trait: hand over a [`ReportDocument`], receive the
//! rendered bytes. The render contract is deterministic for identical input,
//! and render failures never fail a workflow transition - callers catch and
//! log them.

pub mod http;

pub use http::HttpRenderer;

use crate::domain::errors::RenderError;
use crate::reporting::document::ReportDocument;
use async_trait::async_trait;

/// PDF rendering collaborator
#[async_trait]
pub trait ReportRenderer: Send + Sync {
    /// Render a report document to PDF bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the renderer is unreachable or rejects the
    /// document.
    async fn render(&self, document: &ReportDocument) -> Result<Vec<u8>, RenderError>;
}
