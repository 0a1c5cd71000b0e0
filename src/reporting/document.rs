//! Render payload for a report document
//!
//! Everything the PDF renderer needs in one serializable value: request and
//! patient header, the engine's findings, interpretation text, clinic
//! letterhead, and the confirmers with resolved signature image URLs.
//! Rendering is deterministic given an identical document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One confirmer block on the document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfirmerBlock {
    /// Display name
    pub name: String,

    /// Role printed beneath the name
    pub role: Option<String>,

    /// Absolute URL of the signature image, if the staff member has one
    pub signature_url: Option<String>,

    /// When the confirmation was recorded
    pub confirmed_at: DateTime<Utc>,
}

/// The full render payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportDocument {
    /// Request identifier, printed as the report number
    pub request_id: String,

    /// Patient identifier
    pub patient_id: String,

    /// Gene under test
    pub gene: String,

    /// Specimen type
    pub specimen: String,

    /// Diplotype label
    pub genotype: String,

    /// Metabolizer phenotype
    pub phenotype: String,

    /// Combined activity score
    pub activity_score: f64,

    /// Interpretation text
    pub genotype_summary: String,

    /// Clinical recommendation text
    pub recommendation: String,

    /// Clinic name for the letterhead
    pub clinic_name: String,

    /// Clinic address for the letterhead
    pub clinic_address: String,

    /// Issue timestamp printed on the document
    pub issued_at: DateTime<Utc>,

    /// Confirmers in slot order; empty until the first confirmation
    pub confirmers: Vec<ConfirmerBlock>,
}
