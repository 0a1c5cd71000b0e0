//! Datastore abstraction traits
//!
//! This module defines the traits that datastore adapters must implement for
//! the workflow to read and write test requests, reports, and staff records.
//!
//! Single-record reads return `Ok(None)` for not-found, distinct from an I/O
//! error. Every workflow mutation is a conditional write: the adapter asserts
//! the expected prior state and reports [`ConditionalUpdate::PreconditionFailed`]
//! when the record changed underneath the caller, so two staff members
//! confirming at the same moment can never land in the same confirmer slot.

use crate::domain::errors::DatastoreError;
use crate::domain::ids::{RequestId, StaffId};
use crate::domain::report::Report;
use crate::domain::request::{
    AlleleObservations, ConfirmationPlan, RejectionPlan, RequestStatus, TestRequest,
};
use crate::domain::staff::Staff;
use async_trait::async_trait;

/// Outcome of a conditional datastore write
#[derive(Debug, Clone)]
pub enum ConditionalUpdate {
    /// The precondition held; the update was applied. Carries the persisted
    /// record as the datastore returned it.
    Applied(TestRequest),

    /// The record no longer satisfied the asserted prior state; nothing was
    /// written. The caller reloads and re-plans.
    PreconditionFailed,
}

impl ConditionalUpdate {
    /// Whether the update was applied
    pub fn was_applied(&self) -> bool {
        matches!(self, ConditionalUpdate::Applied(_))
    }
}

/// Test request persistence
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Fetch a request by id
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O failures; a missing record is `Ok(None)`.
    async fn get_request(&self, id: &RequestId) -> Result<Option<TestRequest>, DatastoreError>;

    /// Insert a new request
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or the id already exists.
    async fn insert_request(&self, request: &TestRequest) -> Result<TestRequest, DatastoreError>;

    /// Attach allele observations, asserting the expected prior status
    ///
    /// Writes the payload and moves the status to `new_status` in one
    /// conditional update.
    async fn store_alleles(
        &self,
        id: &RequestId,
        observations: &AlleleObservations,
        expected_status: RequestStatus,
        new_status: RequestStatus,
    ) -> Result<ConditionalUpdate, DatastoreError>;

    /// Apply a planned confirmation
    ///
    /// The adapter must assert, atomically with the write, that the record
    /// still has the plan's expected status and that the target confirmer
    /// slot is still empty.
    async fn apply_confirmation(
        &self,
        plan: &ConfirmationPlan,
    ) -> Result<ConditionalUpdate, DatastoreError>;

    /// Apply a planned rejection, asserting the expected prior status
    async fn apply_rejection(
        &self,
        plan: &RejectionPlan,
    ) -> Result<ConditionalUpdate, DatastoreError>;
}

/// Report persistence
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Fetch the report for a request, if one exists
    async fn get_report(&self, request_id: &RequestId)
        -> Result<Option<Report>, DatastoreError>;

    /// Insert a new report
    async fn insert_report(&self, report: &Report) -> Result<Report, DatastoreError>;

    /// Overwrite the report's PDF pointer
    ///
    /// The pointer is overwritten, not versioned; confirmations regenerate
    /// the document in place.
    async fn update_pdf_path(
        &self,
        request_id: &RequestId,
        pdf_path: &str,
    ) -> Result<(), DatastoreError>;
}

/// Staff record lookups
#[async_trait]
pub trait StaffDirectory: Send + Sync {
    /// Fetch a staff record by id
    async fn get_staff(&self, id: &StaffId) -> Result<Option<Staff>, DatastoreError>;
}
