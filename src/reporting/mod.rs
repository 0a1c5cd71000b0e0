//! Report content assembly and document pipeline
//!
//! Builds report records from engine predictions, resolves confirmer
//! signatures, and drives the render/upload/pointer-update pipeline against
//! the collaborator adapters.

pub mod document;
pub mod generator;
pub mod signature;

pub use document::{ConfirmerBlock, ReportDocument};
pub use generator::ReportGenerator;
pub use signature::SignatureResolver;
