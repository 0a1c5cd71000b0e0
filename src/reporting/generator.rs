//! Report generation pipeline
//!
//! Assembles the report record and its rendered document. Two entry points:
//!
//! - [`ReportGenerator::create_report`] when allele data is first finalized:
//!   persists the report row (fatal on failure), then attempts the first
//!   render/upload best-effort.
//! - [`ReportGenerator::regenerate_with_signatures`] after a confirmation:
//!   re-renders with the confirmers' signature blocks and overwrites the
//!   report's PDF pointer. The caller treats any failure here as
//!   caught-and-logged; the confirmation itself is already durable.

use crate::adapters::datastore::traits::{ReportStore, StaffDirectory};
use crate::adapters::render::ReportRenderer;
use crate::adapters::storage::ObjectStorage;
use crate::config::schema::ReportingConfig;
use crate::domain::errors::{DatastoreError, MendelError};
use crate::domain::ids::StaffId;
use crate::domain::report::{Report, ReportBuilder};
use crate::domain::request::TestRequest;
use crate::reporting::document::{ConfirmerBlock, ReportDocument};
use crate::reporting::signature::SignatureResolver;
use crate::rulebase::engine::Prediction;
use crate::rulebase::model::DiplotypeRow;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Builds, renders, uploads and points at report documents
pub struct ReportGenerator {
    reports: Arc<dyn ReportStore>,
    staff: Arc<dyn StaffDirectory>,
    renderer: Arc<dyn ReportRenderer>,
    storage: Arc<dyn ObjectStorage>,
    resolver: SignatureResolver,
    clinic_name: String,
    clinic_address: String,
}

impl ReportGenerator {
    /// Create a generator over the collaborator adapters
    pub fn new(
        reports: Arc<dyn ReportStore>,
        staff: Arc<dyn StaffDirectory>,
        renderer: Arc<dyn ReportRenderer>,
        storage: Arc<dyn ObjectStorage>,
        resolver: SignatureResolver,
        config: &ReportingConfig,
    ) -> Self {
        Self {
            reports,
            staff,
            renderer,
            storage,
            resolver,
            clinic_name: config.clinic_name.clone(),
            clinic_address: config.clinic_address.clone(),
        }
    }

    /// Deterministic object name for a request's PDF
    ///
    /// Re-uploads under the same name overwrite in place, keeping the public
    /// URL stable across regenerations.
    pub fn object_name(request: &TestRequest) -> String {
        format!("reports/{}.pdf", request.id)
    }

    /// Creates the report record for freshly finalized allele data
    ///
    /// The reference diplotype row supplies summary and recommendation text
    /// when one exists; otherwise the prediction's values stand on their own
    /// with generic fallback text. Persisting the row is fatal on failure;
    /// the initial render/upload is best-effort and leaves the PDF pointer
    /// empty if it fails.
    pub async fn create_report(
        &self,
        request: &TestRequest,
        prediction: &Prediction,
        diplotype: Option<DiplotypeRow>,
    ) -> Result<Report, DatastoreError> {
        let (genotype_summary, recommendation) = match &diplotype {
            Some(row) => (row.genotype_summary.clone(), row.recommendation.clone()),
            None => (
                format!(
                    "Diplotype {} predicted for {} from observed allele calls.",
                    prediction.genotype, prediction.gene
                ),
                "No specific dosing guidance on file for this diplotype. \
                 Clinical correlation advised."
                    .to_string(),
            ),
        };

        let report = ReportBuilder::new(request.id.clone())
            .genotype(&prediction.genotype)
            .phenotype(&prediction.phenotype)
            .activity_score(prediction.activity_score)
            .genotype_summary(genotype_summary)
            .recommendation(recommendation)
            .build();

        let mut report = self.reports.insert_report(&report).await?;

        // First render carries no signatures yet; a failure here leaves the
        // pointer empty and the next confirmation regenerates anyway.
        match self.render_and_store(request, &report, Vec::new()).await {
            Ok(url) => {
                report.pdf_path = url;
            }
            Err(e) => {
                tracing::warn!(
                    request_id = %request.id,
                    error = %e,
                    "Initial report render failed; PDF pointer left empty"
                );
            }
        }

        Ok(report)
    }

    /// Regenerates the PDF with the request's confirmer signatures
    ///
    /// Returns the new public URL. Callers invoke this after the confirmation
    /// is durable and catch every error.
    pub async fn regenerate_with_signatures(
        &self,
        request: &TestRequest,
    ) -> Result<String, MendelError> {
        let report = self
            .reports
            .get_report(&request.id)
            .await
            .map_err(MendelError::Datastore)?
            .ok_or_else(|| {
                MendelError::Other(format!("No report exists for request '{}'", request.id))
            })?;

        let confirmers = self.confirmer_blocks(request).await?;
        self.render_and_store(request, &report, confirmers).await
    }

    /// Builds confirmer blocks in slot order
    ///
    /// A missing staff record degrades to the bare staff id with no
    /// signature; a datastore I/O error propagates.
    async fn confirmer_blocks(
        &self,
        request: &TestRequest,
    ) -> Result<Vec<ConfirmerBlock>, MendelError> {
        let slots: [(&Option<StaffId>, &Option<DateTime<Utc>>); 2] = [
            (&request.confirmed_by_1, &request.confirmed_at_1),
            (&request.confirmed_by_2, &request.confirmed_at_2),
        ];

        let mut blocks = Vec::new();
        for (staff_id, confirmed_at) in slots {
            let (Some(staff_id), Some(confirmed_at)) = (staff_id, confirmed_at) else {
                continue;
            };

            let block = match self
                .staff
                .get_staff(staff_id)
                .await
                .map_err(MendelError::Datastore)?
            {
                Some(staff) => ConfirmerBlock {
                    name: staff.name,
                    role: staff.role,
                    signature_url: staff
                        .signature_path
                        .as_deref()
                        .map(|path| self.resolver.resolve(path)),
                    confirmed_at: *confirmed_at,
                },
                None => {
                    tracing::warn!(
                        staff_id = %staff_id,
                        "Confirmer has no staff record; printing id without signature"
                    );
                    ConfirmerBlock {
                        name: staff_id.as_str().to_string(),
                        role: None,
                        signature_url: None,
                        confirmed_at: *confirmed_at,
                    }
                }
            };
            blocks.push(block);
        }

        Ok(blocks)
    }

    /// Render, upload, and overwrite the report's PDF pointer
    async fn render_and_store(
        &self,
        request: &TestRequest,
        report: &Report,
        confirmers: Vec<ConfirmerBlock>,
    ) -> Result<String, MendelError> {
        let document = ReportDocument {
            request_id: request.id.as_str().to_string(),
            patient_id: request.patient_id.as_str().to_string(),
            gene: request.test_target.as_str().to_string(),
            specimen: request.specimen.clone(),
            genotype: report.genotype.clone(),
            phenotype: report.phenotype.clone(),
            activity_score: report.activity_score,
            genotype_summary: report.genotype_summary.clone(),
            recommendation: report.recommendation.clone(),
            clinic_name: self.clinic_name.clone(),
            clinic_address: self.clinic_address.clone(),
            issued_at: Utc::now(),
            confirmers,
        };

        let bytes = self
            .renderer
            .render(&document)
            .await
            .map_err(MendelError::Render)?;

        let url = self
            .storage
            .upload(&Self::object_name(request), bytes, "application/pdf")
            .await
            .map_err(MendelError::Storage)?;

        self.reports
            .update_pdf_path(&request.id, &url)
            .await
            .map_err(MendelError::Datastore)?;

        tracing::info!(
            request_id = %request.id,
            url = %url,
            "Report PDF updated"
        );

        Ok(url)
    }
}
