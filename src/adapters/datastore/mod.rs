//! Datastore adapters
//!
//! The workflow talks to persistence through the traits in [`traits`];
//! [`rest`] implements them against the hosted datastore's row API and
//! [`memory`] implements them in-process for tests and dry runs.

pub mod memory;
pub mod rest;
pub mod traits;

pub use memory::InMemoryDatastore;
pub use rest::RestDatastore;
pub use traits::{ConditionalUpdate, ReportStore, RequestStore, StaffDirectory};
