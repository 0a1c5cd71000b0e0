//! Domain identifier types with validation
//!
//! This module provides newtype wrappers for the identifiers flowing through the
//! test workflow. Each type ensures type safety and rejects structurally empty values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Test request identifier newtype wrapper
///
/// Represents a unique identifier for a test request record in the datastore.
///
/// # Examples
///
/// ```
/// use mendel::domain::ids::RequestId;
/// use std::str::FromStr;
///
/// let request_id = RequestId::from_str("req-7d44b88c").unwrap();
/// assert_eq!(request_id.as_str(), "req-7d44b88c");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Creates a new RequestId from a string
    ///
    /// # Arguments
    ///
    /// * `id` - The request identifier string
    ///
    /// # Returns
    ///
    /// Returns `Ok(RequestId)` if the ID is valid, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Request ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Generates a fresh random request ID
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the request ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RequestId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for RequestId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Patient identifier newtype wrapper
///
/// Represents a unique identifier for a patient. Typically a medical record
/// number or a UUID, depending on the upstream intake system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatientId(String);

impl PatientId {
    /// Creates a new PatientId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Patient ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the patient ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Staff identifier newtype wrapper
///
/// Identifies a laboratory staff member (medical technician, pharmacist,
/// supervisor). Confirmer and rejecter slots on a test request hold these.
///
/// # Examples
///
/// ```
/// use mendel::domain::ids::StaffId;
///
/// let staff_id = StaffId::new("alice").unwrap();
/// assert_eq!(staff_id.as_str(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaffId(String);

impl StaffId {
    /// Creates a new StaffId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Staff ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the staff ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StaffId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for StaffId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Pharmacogene symbol newtype wrapper
///
/// The gene target of a test, e.g. `CYP2D6`, `CYP2C19`, `CYP2C9`. Symbols are
/// stored trimmed but otherwise verbatim; rulebase lookups are exact.
///
/// # Examples
///
/// ```
/// use mendel::domain::ids::GeneSymbol;
///
/// let gene = GeneSymbol::new("CYP2D6").unwrap();
/// assert_eq!(gene.as_str(), "CYP2D6");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneSymbol(String);

impl GeneSymbol {
    /// Creates a new GeneSymbol from a string
    ///
    /// Leading and trailing whitespace is stripped.
    pub fn new(symbol: impl Into<String>) -> Result<Self, String> {
        let symbol = symbol.into().trim().to_string();
        if symbol.is_empty() {
            return Err("Gene symbol cannot be empty".to_string());
        }
        Ok(Self(symbol))
    }

    /// Returns the gene symbol as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for GeneSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GeneSymbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for GeneSymbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
