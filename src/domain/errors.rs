//! Domain error types
//!
//! This module defines the error hierarchy for Mendel. All errors are
//! domain-specific and don't expose third-party types.
//!
//! Workflow precondition denials are deliberately separate from collaborator
//! I/O failures: a denial means no state changed and the caller can correct
//! input or wait, while a datastore/storage/render failure is fatal to the
//! operation that needed it.

use crate::domain::ids::StaffId;
use thiserror::Error;

/// Main Mendel error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum MendelError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Datastore-related errors
    #[error("Datastore error: {0}")]
    Datastore(#[from] DatastoreError),

    /// Object storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Report rendering errors
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Workflow precondition or state errors
    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    /// Rulebase loading errors
    #[error("Rulebase error: {0}")]
    Rulebase(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Datastore-specific errors
///
/// Errors that occur when talking to the hosted datastore's row API.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum DatastoreError {
    /// Failed to connect to the datastore
    #[error("Failed to connect to datastore: {0}")]
    ConnectionFailed(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Write failed
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// Invalid response from the datastore
    #[error("Invalid response from datastore: {0}")]
    InvalidResponse(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

/// Object storage errors
///
/// Errors that occur when uploading rendered documents to object storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to connect to the storage service
    #[error("Failed to connect to storage: {0}")]
    ConnectionFailed(String),

    /// Upload failed
    #[error("Upload failed for '{name}': {message}")]
    UploadFailed { name: String, message: String },

    /// Server rejected the request
    #[error("Storage error: {status} - {message}")]
    ServerError { status: u16, message: String },
}

/// Report rendering errors
///
/// Errors from the PDF render collaborator. These never fail a workflow
/// transition; callers catch and log them.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Failed to reach the render service
    #[error("Failed to connect to render service: {0}")]
    ConnectionFailed(String),

    /// The render service rejected the document
    #[error("Render failed: {0}")]
    RenderFailed(String),

    /// The document could not be serialized for rendering
    #[error("Invalid report document: {0}")]
    InvalidDocument(String),
}

/// Workflow precondition and state errors
///
/// Every variant carries a specific, user-facing message explaining why the
/// operation did not proceed. None of these mutate state.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The request does not exist
    #[error("Test request '{0}' was not found")]
    NotFound(String),

    /// Confirmation attempted before allele data was entered
    #[error("Allele data must be filled in before the request can be confirmed")]
    AlleleDataMissing,

    /// Allele data can no longer be replaced
    #[error("Allele data can no longer be changed once confirmation has started")]
    AlleleDataLocked,

    /// The test target gene is not in the loaded rulebase
    #[error("Gene '{0}' is not present in the loaded rulebase")]
    UnknownGene(String),

    /// The same staff member tried to confirm twice
    #[error("Staff member '{0}' has already confirmed this request and cannot confirm it twice")]
    AlreadyConfirmed(StaffId),

    /// Both confirmer slots are already filled
    #[error("The request is already fully confirmed")]
    FullyConfirmed,

    /// The request was rejected earlier and is no longer confirmable
    #[error("The request was rejected and can no longer be processed")]
    AlreadyRejected,

    /// Reject attempted on a completed request
    #[error("The request is already completed and can no longer be rejected")]
    AlreadyCompleted,

    /// A conditional update found the record changed underneath us.
    /// Retryable: reload the request and try again.
    #[error("Another confirmation landed first; reload the request and retry")]
    ConcurrentUpdate,

    /// Collaborator I/O failure during the primary transition
    #[error("Datastore error: {0}")]
    Datastore(#[from] DatastoreError),
}

impl WorkflowError {
    /// Whether the caller may retry the operation unchanged
    ///
    /// Only a lost conditional update is retryable; every other variant needs
    /// corrected input or a different request state.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WorkflowError::ConcurrentUpdate)
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for MendelError {
    fn from(err: std::io::Error) -> Self {
        MendelError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for MendelError {
    fn from(err: serde_json::Error) -> Self {
        MendelError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for MendelError {
    fn from(err: toml::de::Error) -> Self {
        MendelError::Configuration(format!("TOML parse error: {err}"))
    }
}
