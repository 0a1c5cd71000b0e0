//! Wire models for the hosted datastore's row API
//!
//! Rows carry plain strings and let the conversion layer enforce the domain
//! newtypes' validation, so a malformed row surfaces as an
//! [`DatastoreError::InvalidResponse`] instead of leaking into the workflow.

use crate::domain::errors::DatastoreError;
use crate::domain::ids::{GeneSymbol, PatientId, RequestId, StaffId};
use crate::domain::report::Report;
use crate::domain::request::{AlleleObservations, RequestStatus, TestRequest};
use crate::domain::staff::Staff;
use crate::rulebase::model::RuleTable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A `test_requests` row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRequestRow {
    pub id: String,
    pub patient_id: String,
    pub test_target: String,
    pub specimen: String,
    pub status: RequestStatus,
    pub confirmed_by_1: Option<String>,
    pub confirmed_at_1: Option<DateTime<Utc>>,
    pub confirmed_by_2: Option<String>,
    pub confirmed_at_2: Option<DateTime<Utc>>,
    pub rejected_by: Option<String>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub allele_data: Option<AlleleObservations>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn invalid(field: &str, err: impl std::fmt::Display) -> DatastoreError {
    DatastoreError::InvalidResponse(format!("Invalid '{field}' in row: {err}"))
}

impl TryFrom<TestRequestRow> for TestRequest {
    type Error = DatastoreError;

    fn try_from(row: TestRequestRow) -> Result<Self, Self::Error> {
        let staff = |value: Option<String>, field: &str| -> Result<Option<StaffId>, DatastoreError> {
            value
                .map(|v| StaffId::new(v).map_err(|e| invalid(field, e)))
                .transpose()
        };

        Ok(TestRequest {
            id: RequestId::new(row.id).map_err(|e| invalid("id", e))?,
            patient_id: PatientId::new(row.patient_id).map_err(|e| invalid("patient_id", e))?,
            test_target: GeneSymbol::new(row.test_target)
                .map_err(|e| invalid("test_target", e))?,
            specimen: row.specimen,
            status: row.status,
            confirmed_by_1: staff(row.confirmed_by_1, "confirmed_by_1")?,
            confirmed_at_1: row.confirmed_at_1,
            confirmed_by_2: staff(row.confirmed_by_2, "confirmed_by_2")?,
            confirmed_at_2: row.confirmed_at_2,
            rejected_by: staff(row.rejected_by, "rejected_by")?,
            rejected_at: row.rejected_at,
            rejection_reason: row.rejection_reason,
            allele_data: row.allele_data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<&TestRequest> for TestRequestRow {
    fn from(request: &TestRequest) -> Self {
        Self {
            id: request.id.as_str().to_string(),
            patient_id: request.patient_id.as_str().to_string(),
            test_target: request.test_target.as_str().to_string(),
            specimen: request.specimen.clone(),
            status: request.status,
            confirmed_by_1: request.confirmed_by_1.as_ref().map(|s| s.as_str().to_string()),
            confirmed_at_1: request.confirmed_at_1,
            confirmed_by_2: request.confirmed_by_2.as_ref().map(|s| s.as_str().to_string()),
            confirmed_at_2: request.confirmed_at_2,
            rejected_by: request.rejected_by.as_ref().map(|s| s.as_str().to_string()),
            rejected_at: request.rejected_at,
            rejection_reason: request.rejection_reason.clone(),
            allele_data: request.allele_data.clone(),
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

/// A `reports` row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    pub id: String,
    pub request_id: String,
    pub genotype: String,
    pub phenotype: String,
    pub activity_score: f64,
    pub genotype_summary: String,
    pub recommendation: String,
    pub pdf_path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ReportRow> for Report {
    type Error = DatastoreError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        Ok(Report {
            id: row.id,
            request_id: RequestId::new(row.request_id).map_err(|e| invalid("request_id", e))?,
            genotype: row.genotype,
            phenotype: row.phenotype,
            activity_score: row.activity_score,
            genotype_summary: row.genotype_summary,
            recommendation: row.recommendation,
            pdf_path: row.pdf_path,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<&Report> for ReportRow {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id.clone(),
            request_id: report.request_id.as_str().to_string(),
            genotype: report.genotype.clone(),
            phenotype: report.phenotype.clone(),
            activity_score: report.activity_score,
            genotype_summary: report.genotype_summary.clone(),
            recommendation: report.recommendation.clone(),
            pdf_path: report.pdf_path.clone(),
            created_at: report.created_at,
            updated_at: report.updated_at,
        }
    }
}

/// A `staff` row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffRow {
    pub id: String,
    pub name: String,
    pub role: Option<String>,
    pub signature_path: Option<String>,
}

impl TryFrom<StaffRow> for Staff {
    type Error = DatastoreError;

    fn try_from(row: StaffRow) -> Result<Self, Self::Error> {
        Ok(Staff {
            id: StaffId::new(row.id).map_err(|e| invalid("id", e))?,
            name: row.name,
            role: row.role,
            signature_path: row.signature_path,
        })
    }
}

/// A `rulebase_snapshots` row: one versioned JSON document holding the whole table
#[derive(Debug, Clone, Deserialize)]
pub struct RulebaseSnapshotRow {
    pub payload: RuleTable,
}
