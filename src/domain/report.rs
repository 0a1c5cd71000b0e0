//! Report domain model
//!
//! One report exists per test request, created when allele data is first
//! finalized. The `pdf_path` pointer is overwritten, not versioned, every time
//! the document is regenerated with new confirmation signatures.

use crate::domain::ids::RequestId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Derived report artifact for a test request
///
/// Holds the rule engine's findings plus the free-text interpretation and a
/// pointer to the rendered PDF in object storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Unique identifier for this report record
    pub id: String,

    /// The request this report belongs to (one-to-one)
    pub request_id: RequestId,

    /// Diplotype label, e.g. `*1/*41`
    pub genotype: String,

    /// Metabolizer phenotype, e.g. "Intermediate Metabolizer"
    pub phenotype: String,

    /// Combined allele activity score
    pub activity_score: f64,

    /// Free-text genotype interpretation
    pub genotype_summary: String,

    /// Free-text clinical recommendation
    pub recommendation: String,

    /// Public URL of the rendered PDF; empty until the first successful render
    pub pdf_path: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last pdf_path overwrite
    pub updated_at: DateTime<Utc>,
}

/// Builder for creating Report instances
pub struct ReportBuilder {
    request_id: RequestId,
    genotype: String,
    phenotype: String,
    activity_score: f64,
    genotype_summary: String,
    recommendation: String,
    pdf_path: String,
}

impl ReportBuilder {
    /// Create a new builder for the given request
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            genotype: String::new(),
            phenotype: String::new(),
            activity_score: 0.0,
            genotype_summary: String::new(),
            recommendation: String::new(),
            pdf_path: String::new(),
        }
    }

    /// Set the diplotype label
    pub fn genotype(mut self, genotype: impl Into<String>) -> Self {
        self.genotype = genotype.into();
        self
    }

    /// Set the metabolizer phenotype
    pub fn phenotype(mut self, phenotype: impl Into<String>) -> Self {
        self.phenotype = phenotype.into();
        self
    }

    /// Set the activity score
    pub fn activity_score(mut self, score: f64) -> Self {
        self.activity_score = score;
        self
    }

    /// Set the genotype interpretation text
    pub fn genotype_summary(mut self, summary: impl Into<String>) -> Self {
        self.genotype_summary = summary.into();
        self
    }

    /// Set the clinical recommendation text
    pub fn recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = recommendation.into();
        self
    }

    /// Set the rendered PDF pointer
    pub fn pdf_path(mut self, pdf_path: impl Into<String>) -> Self {
        self.pdf_path = pdf_path.into();
        self
    }

    /// Build the Report instance
    pub fn build(self) -> Report {
        let now = Utc::now();
        Report {
            id: uuid::Uuid::new_v4().to_string(),
            request_id: self.request_id,
            genotype: self.genotype,
            phenotype: self.phenotype,
            activity_score: self.activity_score,
            genotype_summary: self.genotype_summary,
            recommendation: self.recommendation,
            pdf_path: self.pdf_path,
            created_at: now,
            updated_at: now,
        }
    }
}
