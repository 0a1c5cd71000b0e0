//! Staff domain model
//!
//! Minimal view of a staff record: the workflow only needs the identity, a
//! display name for the report, and the stored signature reference used when
//! regenerating a confirmed report.

use crate::domain::ids::StaffId;
use serde::{Deserialize, Serialize};

/// A laboratory staff member
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Staff {
    /// Unique identifier
    pub id: StaffId,

    /// Display name printed on reports
    pub name: String,

    /// Role, e.g. "pharmacist", "medical technician"
    pub role: Option<String>,

    /// Stored signature image reference; either an absolute URL or a
    /// storage-relative path
    pub signature_path: Option<String>,
}

impl Staff {
    /// Create a staff record with just an id and name
    pub fn new(id: StaffId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            role: None,
            signature_path: None,
        }
    }

    /// Set the role
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the signature reference
    pub fn with_signature_path(mut self, path: impl Into<String>) -> Self {
        self.signature_path = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_builder_methods() {
        let staff = Staff::new(StaffId::new("alice").unwrap(), "Alice Tan")
            .with_role("pharmacist")
            .with_signature_path("signatures/alice.png");

        assert_eq!(staff.name, "Alice Tan");
        assert_eq!(staff.role.as_deref(), Some("pharmacist"));
        assert_eq!(staff.signature_path.as_deref(), Some("signatures/alice.png"));
    }

    #[test]
    fn test_staff_serialization() {
        let staff = Staff::new(StaffId::new("bob").unwrap(), "Bob Ilham");
        let json = serde_json::to_string(&staff).unwrap();
        let deserialized: Staff = serde_json::from_str(&json).unwrap();
        assert_eq!(staff, deserialized);
    }
}
