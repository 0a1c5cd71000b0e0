//! Test request workflow service
//!
//! Coordinates the request lifecycle against the datastore, the rule engine,
//! and the report pipeline. Every operation is a short-lived read-plan-write:
//! the current record is fetched, the transition is planned by the pure
//! domain methods, and the write is a conditional update the datastore
//! applies only if the asserted prior state still holds. A lost condition
//! surfaces as the retryable [`WorkflowError::ConcurrentUpdate`].
//!
//! The post-confirmation PDF regeneration is a follow-up action dispatched
//! after the transition is durable; its failures are caught and logged, never
//! propagated.

use crate::adapters::datastore::traits::{ConditionalUpdate, RequestStore};
use crate::adapters::datastore::RestDatastore;
use crate::adapters::render::HttpRenderer;
use crate::adapters::storage::RestStorage;
use crate::config::schema::{MendelConfig, RulebaseSourceKind};
use crate::domain::errors::WorkflowError;
use crate::domain::ids::{GeneSymbol, PatientId, RequestId, StaffId};
use crate::domain::request::{
    AlleleObservations, RequestStatus, TestRequest, TestRequestBuilder,
};
use crate::reporting::generator::ReportGenerator;
use crate::reporting::signature::SignatureResolver;
use crate::rulebase::engine::{MatchOutcome, Prediction, RuleEngine};
use crate::rulebase::model::DiplotypeRow;
use crate::rulebase::source::{FileRulebaseSource, RulebaseSource};
use crate::rulebase::RulebaseHandle;
use crate::workflow::outcome::{ConfirmOutcome, RejectOutcome, SubmitOutcome};
use chrono::Utc;
use std::sync::Arc;

/// Intake fields for a new test request
#[derive(Debug, Clone)]
pub struct NewRequest {
    /// Patient the test belongs to
    pub patient_id: PatientId,

    /// Pharmacogene under test
    pub test_target: GeneSymbol,

    /// Specimen type
    pub specimen: String,

    /// Allele observations, when the intake flow already has the calls;
    /// the request then starts directly at `need_2_confirmation`
    pub allele_data: Option<AlleleObservations>,
}

/// The workflow service
pub struct WorkflowService {
    requests: Arc<dyn RequestStore>,
    engine: RuleEngine,
    generator: Arc<ReportGenerator>,
}

impl WorkflowService {
    /// Create the service over its collaborators
    pub fn new(
        requests: Arc<dyn RequestStore>,
        engine: RuleEngine,
        generator: Arc<ReportGenerator>,
    ) -> Self {
        Self {
            requests,
            engine,
            generator,
        }
    }

    /// Wires the service from configuration
    ///
    /// Builds the REST datastore, storage, and renderer adapters, loads the
    /// configured rulebase, and assembles the report pipeline.
    pub async fn from_config(config: &MendelConfig) -> crate::domain::Result<Self> {
        let datastore = Arc::new(RestDatastore::new(config.datastore.clone()));

        let rulebase_source: Arc<dyn RulebaseSource> = match config.rulebase.source {
            RulebaseSourceKind::File => {
                let path = config.rulebase.path.as_deref().ok_or_else(|| {
                    crate::domain::MendelError::Configuration(
                        "rulebase.path is not configured".to_string(),
                    )
                })?;
                Arc::new(FileRulebaseSource::new(path))
            }
            RulebaseSourceKind::Datastore => {
                Arc::new(RestDatastore::new(config.datastore.clone()))
            }
        };
        let rulebase = Arc::new(RulebaseHandle::load(rulebase_source).await?);
        let engine = RuleEngine::new(rulebase);

        let generator = Arc::new(ReportGenerator::new(
            datastore.clone(),
            datastore.clone(),
            Arc::new(HttpRenderer::new(&config.reporting)),
            Arc::new(RestStorage::new(config.storage.clone())),
            SignatureResolver::new(&config.storage.public_base_url),
            &config.reporting,
        ));

        Ok(Self::new(datastore, engine, generator))
    }

    /// Creates a new test request
    ///
    /// Without allele data the request starts `pending` and waits for
    /// [`WorkflowService::submit_alleles`]. With allele data it starts at
    /// `need_2_confirmation` and the report is created immediately, exactly
    /// as if the data had been submitted separately.
    pub async fn create(&self, intake: NewRequest) -> Result<TestRequest, WorkflowError> {
        let prediction = match &intake.allele_data {
            Some(observations) => Some(self.predict_known_gene(&intake.test_target, observations)?),
            None => None,
        };

        let mut builder = TestRequestBuilder::new(
            intake.patient_id,
            intake.test_target,
            intake.specimen,
        );
        if let Some(observations) = intake.allele_data {
            builder = builder.allele_data(observations);
        }
        let request = self.requests.insert_request(&builder.build()).await?;

        tracing::info!(
            request_id = %request.id,
            gene = %request.test_target,
            status = %request.status,
            "Created test request"
        );

        if let Some(prediction) = prediction {
            let diplotype = self.reference_diplotype(&request.test_target, &prediction);
            self.generator
                .create_report(&request, &prediction, diplotype)
                .await?;
        }

        Ok(request)
    }

    /// Attaches allele observations and creates the report
    ///
    /// Denied on any status but `pending`; the persisted transition asserts
    /// `pending` so a concurrent submission cannot apply twice.
    pub async fn submit_alleles(
        &self,
        id: &RequestId,
        observations: AlleleObservations,
    ) -> Result<SubmitOutcome, WorkflowError> {
        let request = self.load(id).await?;

        match request.status {
            RequestStatus::Pending => {}
            RequestStatus::Rejected => return Err(WorkflowError::AlreadyRejected),
            RequestStatus::Done => return Err(WorkflowError::FullyConfirmed),
            RequestStatus::NeedTwoConfirmations | RequestStatus::NeedOneConfirmation => {
                return Err(WorkflowError::AlleleDataLocked)
            }
        }

        let prediction = self.predict_known_gene(&request.test_target, &observations)?;

        let updated = match self
            .requests
            .store_alleles(
                id,
                &observations,
                RequestStatus::Pending,
                RequestStatus::NeedTwoConfirmations,
            )
            .await?
        {
            ConditionalUpdate::Applied(updated) => updated,
            ConditionalUpdate::PreconditionFailed => return Err(WorkflowError::ConcurrentUpdate),
        };

        let diplotype = self.reference_diplotype(&updated.test_target, &prediction);
        let report = self
            .generator
            .create_report(&updated, &prediction, diplotype)
            .await?;

        tracing::info!(
            request_id = %updated.id,
            genotype = %prediction.genotype,
            phenotype = %prediction.phenotype,
            matched = prediction.matched(),
            "Allele data submitted and report created"
        );

        Ok(SubmitOutcome {
            request: updated,
            report,
            prediction,
        })
    }

    /// Records a confirmation by the given staff member
    ///
    /// The transition itself is the authoritative state change; the PDF
    /// regeneration that follows is best-effort and never affects the
    /// returned outcome.
    pub async fn confirm(
        &self,
        id: &RequestId,
        staff_id: &StaffId,
    ) -> Result<ConfirmOutcome, WorkflowError> {
        let request = self.load(id).await?;
        let plan = request.plan_confirmation(staff_id, Utc::now())?;

        let updated = match self.requests.apply_confirmation(&plan).await? {
            ConditionalUpdate::Applied(updated) => updated,
            ConditionalUpdate::PreconditionFailed => {
                tracing::info!(
                    request_id = %id,
                    staff_id = %staff_id,
                    "Confirmation lost a concurrent update race"
                );
                return Err(WorkflowError::ConcurrentUpdate);
            }
        };

        let outcome = ConfirmOutcome {
            previous_status: plan.expected_status,
            request: updated,
        };

        tracing::info!(
            request_id = %id,
            staff_id = %staff_id,
            status = %outcome.status(),
            "Confirmation recorded"
        );

        // The confirmation is durable; refresh the signed document and
        // swallow every failure.
        if let Err(e) = self
            .generator
            .regenerate_with_signatures(&outcome.request)
            .await
        {
            tracing::warn!(
                request_id = %id,
                error = %e,
                "Report regeneration after confirmation failed; confirmation stands"
            );
        }

        Ok(outcome)
    }

    /// Rejects the request with a free-text reason
    ///
    /// Allowed from any non-terminal status regardless of confirmation count.
    pub async fn reject(
        &self,
        id: &RequestId,
        staff_id: &StaffId,
        reason: impl Into<String>,
    ) -> Result<RejectOutcome, WorkflowError> {
        let request = self.load(id).await?;
        let plan = request.plan_rejection(staff_id, reason, Utc::now())?;

        let updated = match self.requests.apply_rejection(&plan).await? {
            ConditionalUpdate::Applied(updated) => updated,
            ConditionalUpdate::PreconditionFailed => return Err(WorkflowError::ConcurrentUpdate),
        };

        tracing::info!(
            request_id = %id,
            staff_id = %staff_id,
            "Request rejected"
        );

        Ok(RejectOutcome { request: updated })
    }

    async fn load(&self, id: &RequestId) -> Result<TestRequest, WorkflowError> {
        self.requests
            .get_request(id)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(id.as_str().to_string()))
    }

    /// Runs a prediction, denying submission for genes the rulebase doesn't know
    ///
    /// The engine flags unknown genes in its result rather than erroring; at
    /// the workflow boundary that marker becomes a denial, because a request
    /// against an unknown gene can never produce a meaningful report.
    fn predict_known_gene(
        &self,
        gene: &GeneSymbol,
        observations: &AlleleObservations,
    ) -> Result<Prediction, WorkflowError> {
        let prediction = self.engine.predict(gene, observations);
        if prediction.outcome == MatchOutcome::UnknownGene {
            return Err(WorkflowError::UnknownGene(gene.as_str().to_string()));
        }
        Ok(prediction)
    }

    fn reference_diplotype(
        &self,
        gene: &GeneSymbol,
        prediction: &Prediction,
    ) -> Option<DiplotypeRow> {
        self.engine.lookup_diplotype(gene, &prediction.genotype)
    }
}
