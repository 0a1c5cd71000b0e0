//! Test request lifecycle workflow
//!
//! The dual-confirmation state machine over test requests: allele submission,
//! two ordered independent sign-offs, and rejection. See
//! [`crate::domain::request`] for the pure transition rules and
//! [`service::WorkflowService`] for the coordinated operations.

pub mod outcome;
pub mod service;

pub use outcome::{ConfirmOutcome, RejectOutcome, SubmitOutcome};
pub use service::{NewRequest, WorkflowService};
