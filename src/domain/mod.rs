//! Domain models and types for Mendel.
//!
//! This module contains the core domain models, types, and business rules:
//!
//! - **Strongly-typed identifiers** ([`RequestId`], [`PatientId`], [`StaffId`],
//!   [`GeneSymbol`])
//! - **Domain models** ([`TestRequest`], [`Report`], [`Staff`])
//! - **Error types** ([`MendelError`], [`DatastoreError`], [`WorkflowError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Mendel uses the newtype pattern for identifiers to prevent mixing different
//! ID types:
//!
//! ```rust
//! use mendel::domain::{PatientId, StaffId};
//!
//! # fn example() -> std::result::Result<(), String> {
//! let patient_id = PatientId::new("MRN-442")?;
//! let staff_id = StaffId::new("alice")?;
//!
//! // This won't compile - type safety prevents mixing IDs
//! // let wrong: PatientId = staff_id;  // Compile error!
//! # Ok(())
//! # }
//! ```
//!
//! # Lifecycle
//!
//! [`TestRequest`] owns the dual-confirmation state machine; transitions are
//! planned with pure methods ([`TestRequest::plan_confirmation`],
//! [`TestRequest::plan_rejection`]) and applied by a datastore adapter with a
//! conditional update.

pub mod errors;
pub mod ids;
pub mod report;
pub mod request;
pub mod result;
pub mod staff;

// Re-export commonly used types for convenience
pub use errors::{
    DatastoreError, MendelError, RenderError, StorageError, WorkflowError,
};
pub use ids::{GeneSymbol, PatientId, RequestId, StaffId};
pub use report::{Report, ReportBuilder};
pub use request::{
    AlleleObservations, ConfirmationPlan, ConfirmerSlot, RejectionPlan, RequestStatus,
    TestRequest, TestRequestBuilder,
};
pub use result::Result;
pub use staff::Staff;
