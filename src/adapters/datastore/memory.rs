//! In-memory datastore
//!
//! Implements every store trait over tokio-mutexed maps. The
//! conditional-update semantics mirror the REST adapter's filtered UPDATEs
//! exactly, which is what makes the workflow's race behavior testable without
//! a live datastore.

use crate::adapters::datastore::traits::{
    ConditionalUpdate, ReportStore, RequestStore, StaffDirectory,
};
use crate::domain::errors::DatastoreError;
use crate::domain::ids::{RequestId, StaffId};
use crate::domain::report::Report;
use crate::domain::request::{
    AlleleObservations, ConfirmationPlan, ConfirmerSlot, RejectionPlan, RequestStatus, TestRequest,
};
use crate::domain::staff::Staff;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// In-memory implementation of the datastore traits
#[derive(Default)]
pub struct InMemoryDatastore {
    requests: Mutex<HashMap<RequestId, TestRequest>>,
    reports: Mutex<HashMap<RequestId, Report>>,
    staff: Mutex<HashMap<StaffId, Staff>>,
}

impl InMemoryDatastore {
    /// Create an empty datastore
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a staff record
    pub async fn add_staff(&self, staff: Staff) {
        self.staff.lock().await.insert(staff.id.clone(), staff);
    }

    /// Number of stored requests
    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl RequestStore for InMemoryDatastore {
    async fn get_request(&self, id: &RequestId) -> Result<Option<TestRequest>, DatastoreError> {
        Ok(self.requests.lock().await.get(id).cloned())
    }

    async fn insert_request(&self, request: &TestRequest) -> Result<TestRequest, DatastoreError> {
        let mut requests = self.requests.lock().await;
        if requests.contains_key(&request.id) {
            return Err(DatastoreError::WriteFailed(format!(
                "Request '{}' already exists",
                request.id
            )));
        }
        requests.insert(request.id.clone(), request.clone());
        Ok(request.clone())
    }

    async fn store_alleles(
        &self,
        id: &RequestId,
        observations: &AlleleObservations,
        expected_status: RequestStatus,
        new_status: RequestStatus,
    ) -> Result<ConditionalUpdate, DatastoreError> {
        let mut requests = self.requests.lock().await;
        let Some(request) = requests.get_mut(id) else {
            return Ok(ConditionalUpdate::PreconditionFailed);
        };
        if request.status != expected_status {
            return Ok(ConditionalUpdate::PreconditionFailed);
        }

        request.allele_data = Some(observations.clone());
        request.status = new_status;
        request.updated_at = Utc::now();
        Ok(ConditionalUpdate::Applied(request.clone()))
    }

    async fn apply_confirmation(
        &self,
        plan: &ConfirmationPlan,
    ) -> Result<ConditionalUpdate, DatastoreError> {
        let mut requests = self.requests.lock().await;
        let Some(request) = requests.get_mut(&plan.request_id) else {
            return Ok(ConditionalUpdate::PreconditionFailed);
        };

        // Same assertions the REST adapter expresses as UPDATE filters:
        // expected status and an empty target slot.
        let slot_free = match plan.slot {
            ConfirmerSlot::First => request.confirmed_by_1.is_none(),
            ConfirmerSlot::Second => request.confirmed_by_2.is_none(),
        };
        if request.status != plan.expected_status || !slot_free {
            return Ok(ConditionalUpdate::PreconditionFailed);
        }

        request.apply_confirmation(plan);
        Ok(ConditionalUpdate::Applied(request.clone()))
    }

    async fn apply_rejection(
        &self,
        plan: &RejectionPlan,
    ) -> Result<ConditionalUpdate, DatastoreError> {
        let mut requests = self.requests.lock().await;
        let Some(request) = requests.get_mut(&plan.request_id) else {
            return Ok(ConditionalUpdate::PreconditionFailed);
        };
        if request.status != plan.expected_status {
            return Ok(ConditionalUpdate::PreconditionFailed);
        }

        request.apply_rejection(plan);
        Ok(ConditionalUpdate::Applied(request.clone()))
    }
}

#[async_trait]
impl ReportStore for InMemoryDatastore {
    async fn get_report(
        &self,
        request_id: &RequestId,
    ) -> Result<Option<Report>, DatastoreError> {
        Ok(self.reports.lock().await.get(request_id).cloned())
    }

    async fn insert_report(&self, report: &Report) -> Result<Report, DatastoreError> {
        let mut reports = self.reports.lock().await;
        if reports.contains_key(&report.request_id) {
            return Err(DatastoreError::WriteFailed(format!(
                "Report for request '{}' already exists",
                report.request_id
            )));
        }
        reports.insert(report.request_id.clone(), report.clone());
        Ok(report.clone())
    }

    async fn update_pdf_path(
        &self,
        request_id: &RequestId,
        pdf_path: &str,
    ) -> Result<(), DatastoreError> {
        let mut reports = self.reports.lock().await;
        let Some(report) = reports.get_mut(request_id) else {
            return Err(DatastoreError::WriteFailed(format!(
                "No report for request '{request_id}'"
            )));
        };
        report.pdf_path = pdf_path.to_string();
        report.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl StaffDirectory for InMemoryDatastore {
    async fn get_staff(&self, id: &StaffId) -> Result<Option<Staff>, DatastoreError> {
        Ok(self.staff.lock().await.get(id).cloned())
    }
}
