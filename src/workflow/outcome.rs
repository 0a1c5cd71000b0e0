//! Workflow operation outcomes
//!
//! Successful operations return explicit result values carrying the persisted
//! record, the transition that happened, and a human-readable message; the
//! denial side of the taxonomy lives in
//! [`crate::domain::errors::WorkflowError`].

use crate::domain::report::Report;
use crate::domain::request::{RequestStatus, TestRequest};
use crate::rulebase::engine::Prediction;

/// Result of a successful allele submission
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// The request after the transition
    pub request: TestRequest,

    /// The report created for the finalized allele data
    pub report: Report,

    /// The engine's prediction, including its match marker
    pub prediction: Prediction,
}

/// Result of a successful confirmation
#[derive(Debug, Clone)]
pub struct ConfirmOutcome {
    /// The request after the transition
    pub request: TestRequest,

    /// Status before the confirmation
    pub previous_status: RequestStatus,
}

impl ConfirmOutcome {
    /// Status after the confirmation
    pub fn status(&self) -> RequestStatus {
        self.request.status
    }

    /// Whether this confirmation was the second of two
    pub fn is_fully_confirmed(&self) -> bool {
        self.request.status == RequestStatus::Done
    }

    /// Human-readable outcome message
    pub fn message(&self) -> &'static str {
        if self.is_fully_confirmed() {
            "Request is fully confirmed"
        } else {
            "Confirmation recorded; awaiting one more confirmation"
        }
    }
}

/// Result of a successful rejection
#[derive(Debug, Clone)]
pub struct RejectOutcome {
    /// The request after the transition
    pub request: TestRequest,
}

impl RejectOutcome {
    /// Human-readable outcome message
    pub fn message(&self) -> &'static str {
        "Request rejected"
    }
}
