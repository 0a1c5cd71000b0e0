//! REST datastore adapter
//!
//! Implements the store traits against the hosted datastore's row API. Every
//! workflow mutation is a filtered UPDATE whose WHERE clause asserts the
//! expected prior state; zero affected rows means the precondition failed and
//! someone else got there first.

use crate::adapters::datastore::rest::client::DatastoreClient;
use crate::adapters::datastore::rest::models::{
    ReportRow, RulebaseSnapshotRow, StaffRow, TestRequestRow,
};
use crate::adapters::datastore::traits::{
    ConditionalUpdate, ReportStore, RequestStore, StaffDirectory,
};
use crate::config::schema::DatastoreConfig;
use crate::domain::errors::{DatastoreError, MendelError};
use crate::domain::ids::{RequestId, StaffId};
use crate::domain::report::Report;
use crate::domain::request::{
    AlleleObservations, ConfirmationPlan, ConfirmerSlot, RejectionPlan, RequestStatus, TestRequest,
};
use crate::domain::staff::Staff;
use crate::rulebase::model::RuleTable;
use crate::rulebase::source::RulebaseSource;
use async_trait::async_trait;
use chrono::Utc;

/// Datastore adapter over the hosted row API
pub struct RestDatastore {
    client: DatastoreClient,
}

impl RestDatastore {
    /// Create a new adapter from configuration
    pub fn new(config: DatastoreConfig) -> Self {
        Self {
            client: DatastoreClient::new(config),
        }
    }

    fn applied_or_failed(
        mut rows: Vec<TestRequestRow>,
    ) -> Result<ConditionalUpdate, DatastoreError> {
        match rows.pop() {
            Some(row) => Ok(ConditionalUpdate::Applied(TestRequest::try_from(row)?)),
            None => Ok(ConditionalUpdate::PreconditionFailed),
        }
    }
}

#[async_trait]
impl RequestStore for RestDatastore {
    async fn get_request(&self, id: &RequestId) -> Result<Option<TestRequest>, DatastoreError> {
        let rows: Vec<TestRequestRow> = self
            .client
            .get_rows(&format!("test_requests?id=eq.{}&select=*", id.as_str()))
            .await?;

        rows.into_iter().next().map(TestRequest::try_from).transpose()
    }

    async fn insert_request(&self, request: &TestRequest) -> Result<TestRequest, DatastoreError> {
        let row: TestRequestRow = self
            .client
            .insert_row("test_requests", &TestRequestRow::from(request))
            .await?;
        TestRequest::try_from(row)
    }

    async fn store_alleles(
        &self,
        id: &RequestId,
        observations: &AlleleObservations,
        expected_status: RequestStatus,
        new_status: RequestStatus,
    ) -> Result<ConditionalUpdate, DatastoreError> {
        let query = format!(
            "test_requests?id=eq.{}&status=eq.{}",
            id.as_str(),
            expected_status.as_str()
        );
        let body = serde_json::json!({
            "allele_data": observations,
            "status": new_status.as_str(),
            "updated_at": Utc::now(),
        });

        let rows: Vec<TestRequestRow> = self.client.patch_rows(&query, &body).await?;
        Self::applied_or_failed(rows)
    }

    async fn apply_confirmation(
        &self,
        plan: &ConfirmationPlan,
    ) -> Result<ConditionalUpdate, DatastoreError> {
        // The WHERE clause carries the whole precondition: expected status
        // and an empty target slot. Concurrent confirmations race on it and
        // exactly one update can match.
        let (slot_filter, body) = match plan.slot {
            ConfirmerSlot::First => (
                "confirmed_by_1=is.null",
                serde_json::json!({
                    "confirmed_by_1": plan.staff_id.as_str(),
                    "confirmed_at_1": plan.confirmed_at,
                    "status": plan.new_status.as_str(),
                    "updated_at": plan.confirmed_at,
                }),
            ),
            ConfirmerSlot::Second => (
                "confirmed_by_2=is.null",
                serde_json::json!({
                    "confirmed_by_2": plan.staff_id.as_str(),
                    "confirmed_at_2": plan.confirmed_at,
                    "status": plan.new_status.as_str(),
                    "updated_at": plan.confirmed_at,
                }),
            ),
        };

        let query = format!(
            "test_requests?id=eq.{}&status=eq.{}&{}",
            plan.request_id.as_str(),
            plan.expected_status.as_str(),
            slot_filter
        );

        let rows: Vec<TestRequestRow> = self.client.patch_rows(&query, &body).await?;
        Self::applied_or_failed(rows)
    }

    async fn apply_rejection(
        &self,
        plan: &RejectionPlan,
    ) -> Result<ConditionalUpdate, DatastoreError> {
        let query = format!(
            "test_requests?id=eq.{}&status=eq.{}",
            plan.request_id.as_str(),
            plan.expected_status.as_str()
        );
        let body = serde_json::json!({
            "rejected_by": plan.staff_id.as_str(),
            "rejected_at": plan.rejected_at,
            "rejection_reason": plan.reason,
            "status": RequestStatus::Rejected.as_str(),
            "updated_at": plan.rejected_at,
        });

        let rows: Vec<TestRequestRow> = self.client.patch_rows(&query, &body).await?;
        Self::applied_or_failed(rows)
    }
}

#[async_trait]
impl ReportStore for RestDatastore {
    async fn get_report(
        &self,
        request_id: &RequestId,
    ) -> Result<Option<Report>, DatastoreError> {
        let rows: Vec<ReportRow> = self
            .client
            .get_rows(&format!(
                "reports?request_id=eq.{}&select=*",
                request_id.as_str()
            ))
            .await?;

        rows.into_iter().next().map(Report::try_from).transpose()
    }

    async fn insert_report(&self, report: &Report) -> Result<Report, DatastoreError> {
        let row: ReportRow = self
            .client
            .insert_row("reports", &ReportRow::from(report))
            .await?;
        Report::try_from(row)
    }

    async fn update_pdf_path(
        &self,
        request_id: &RequestId,
        pdf_path: &str,
    ) -> Result<(), DatastoreError> {
        let query = format!("reports?request_id=eq.{}", request_id.as_str());
        let body = serde_json::json!({
            "pdf_path": pdf_path,
            "updated_at": Utc::now(),
        });

        let rows: Vec<ReportRow> = self.client.patch_rows(&query, &body).await?;
        if rows.is_empty() {
            return Err(DatastoreError::WriteFailed(format!(
                "No report for request '{request_id}'"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl StaffDirectory for RestDatastore {
    async fn get_staff(&self, id: &StaffId) -> Result<Option<Staff>, DatastoreError> {
        let rows: Vec<StaffRow> = self
            .client
            .get_rows(&format!("staff?id=eq.{}&select=*", id.as_str()))
            .await?;

        rows.into_iter().next().map(Staff::try_from).transpose()
    }
}

#[async_trait]
impl RulebaseSource for RestDatastore {
    async fn load(&self) -> crate::domain::Result<RuleTable> {
        let rows: Vec<RulebaseSnapshotRow> = self
            .client
            .get_rows("rulebase_snapshots?select=payload&order=version.desc&limit=1")
            .await
            .map_err(MendelError::Datastore)?;

        let table = rows
            .into_iter()
            .next()
            .map(|row| row.payload)
            .ok_or_else(|| {
                MendelError::Rulebase("Datastore holds no rulebase snapshot".to_string())
            })?;

        table.validate().map_err(MendelError::Rulebase)?;

        tracing::info!(
            genes = table.gene_count(),
            rules = table.rule_count(),
            diplotypes = table.diplotypes.len(),
            "Loaded rulebase from datastore"
        );

        Ok(table)
    }

    fn describe(&self) -> String {
        format!("datastore:{}", self.client.base_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RetryConfig;

    fn adapter_for(server: &mockito::Server) -> RestDatastore {
        RestDatastore::new(DatastoreConfig {
            base_url: server.url(),
            api_key: "test-key".to_string(),
            timeout_seconds: 5,
            retry: RetryConfig {
                max_retries: 1,
                initial_delay_ms: 1,
                backoff_multiplier: 1.0,
                max_delay_ms: 2,
            },
        })
    }

    const REQUEST_ROW: &str = r#"{
        "id": "req-1",
        "patient_id": "MRN-42",
        "test_target": "CYP2D6",
        "specimen": "EDTA whole blood",
        "status": "need_2_confirmation",
        "confirmed_by_1": null,
        "confirmed_at_1": null,
        "confirmed_by_2": null,
        "confirmed_at_2": null,
        "rejected_by": null,
        "rejected_at": null,
        "rejection_reason": null,
        "allele_data": {"*10": "C/C"},
        "created_at": "2025-11-01T09:00:00Z",
        "updated_at": "2025-11-01T09:00:00Z"
    }"#;

    #[tokio::test]
    async fn test_get_request_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/test_requests?id=eq.req-1&select=*")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!("[{REQUEST_ROW}]"))
            .create_async()
            .await;

        let adapter = adapter_for(&server);
        let request = adapter
            .get_request(&RequestId::new("req-1").unwrap())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(request.status, RequestStatus::NeedTwoConfirmations);
    }

    #[tokio::test]
    async fn test_get_request_not_found_is_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/test_requests?id=eq.req-9&select=*")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let adapter = adapter_for(&server);
        let request = adapter
            .get_request(&RequestId::new("req-9").unwrap())
            .await
            .unwrap();

        assert!(request.is_none());
    }

    #[tokio::test]
    async fn test_confirmation_precondition_failed_on_empty_update() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "PATCH",
                "/rest/v1/test_requests?id=eq.req-1&status=eq.need_2_confirmation&confirmed_by_1=is.null",
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let adapter = adapter_for(&server);
        let plan = ConfirmationPlan {
            request_id: RequestId::new("req-1").unwrap(),
            slot: ConfirmerSlot::First,
            staff_id: StaffId::new("alice").unwrap(),
            confirmed_at: Utc::now(),
            expected_status: RequestStatus::NeedTwoConfirmations,
            new_status: RequestStatus::NeedOneConfirmation,
        };

        let outcome = adapter.apply_confirmation(&plan).await.unwrap();
        assert!(!outcome.was_applied());
    }

    #[tokio::test]
    async fn test_rulebase_source_loads_latest_snapshot() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "GET",
                "/rest/v1/rulebase_snapshots?select=payload&order=version.desc&limit=1",
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"payload": {"genes": [], "diplotypes": []}}]"#,
            )
            .create_async()
            .await;

        let adapter = adapter_for(&server);
        let table = RulebaseSource::load(&adapter).await.unwrap();
        assert_eq!(table.gene_count(), 0);
    }
}
