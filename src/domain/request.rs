//! Test request domain model and lifecycle state machine
//!
//! A test request moves through a fixed lifecycle:
//!
//! ```text
//! pending -> need_2_confirmation -> need_1_confirmation -> done
//!    \______________|________________________|
//!                   v
//!                reject
//! ```
//!
//! `done` and `reject` are terminal. Transitions are planned by pure methods on
//! [`TestRequest`] that reject invalid moves by construction; the datastore
//! applies a plan with a conditional update so two staff members confirming at
//! the same moment cannot land in the same slot.

use crate::domain::errors::WorkflowError;
use crate::domain::ids::{GeneSymbol, PatientId, RequestId, StaffId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Observed allele values keyed by allele-slot name
///
/// The payload a pharmacist enters for a request, e.g. `{"*10": "C/C",
/// "*41": "G/A"}`. Callers may supply any subset of a gene's slots; the rule
/// engine treats unspecified slots as wildcards.
///
/// # Examples
///
/// ```
/// use mendel::domain::request::AlleleObservations;
///
/// let obs = AlleleObservations::from_pairs([("*10", "C/C"), ("*41", "G/A")]);
/// assert_eq!(obs.get("*10"), Some("C/C"));
/// assert_eq!(obs.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlleleObservations(BTreeMap<String, String>);

impl AlleleObservations {
    /// Creates an empty observation set
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builds an observation set from (slot, value) pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns the observed value for a slot, if present
    pub fn get(&self, slot: &str) -> Option<&str> {
        self.0.get(slot).map(String::as_str)
    }

    /// Records an observed value for a slot
    pub fn insert(&mut self, slot: impl Into<String>, value: impl Into<String>) {
        self.0.insert(slot.into(), value.into());
    }

    /// Number of observed slots
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no slots have been observed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over (slot, value) pairs in slot order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Lifecycle status of a test request
///
/// The wire names match the persisted status column:
/// `pending`, `need_2_confirmation`, `need_1_confirmation`, `done`, `reject`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Created, waiting for allele data entry
    #[serde(rename = "pending")]
    Pending,

    /// Allele data present, waiting for the first of two confirmations
    #[serde(rename = "need_2_confirmation")]
    NeedTwoConfirmations,

    /// One confirmation recorded, waiting for the second
    #[serde(rename = "need_1_confirmation")]
    NeedOneConfirmation,

    /// Both confirmations recorded; terminal
    #[serde(rename = "done")]
    Done,

    /// Rejected by a staff member; terminal
    #[serde(rename = "reject")]
    Rejected,
}

impl RequestStatus {
    /// Whether the request can never change state again
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Done | RequestStatus::Rejected)
    }

    /// The persisted column value for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::NeedTwoConfirmations => "need_2_confirmation",
            RequestStatus::NeedOneConfirmation => "need_1_confirmation",
            RequestStatus::Done => "done",
            RequestStatus::Rejected => "reject",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The two ordered confirmer slots on a request
///
/// Slots fill first-empty: the first confirmation always lands in
/// `First`, the second in `Second`. Slots are ordered, not interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmerSlot {
    /// `confirmed_by_1` / `confirmed_at_1`
    First,
    /// `confirmed_by_2` / `confirmed_at_2`
    Second,
}

/// A validated, not-yet-applied confirmation
///
/// Produced by [`TestRequest::plan_confirmation`]. Carries everything the
/// datastore needs to apply the confirmation conditionally: the slot to fill,
/// the status the record must still have, and the status it moves to.
#[derive(Debug, Clone)]
pub struct ConfirmationPlan {
    /// Request being confirmed
    pub request_id: RequestId,
    /// Slot this confirmation fills
    pub slot: ConfirmerSlot,
    /// Confirming staff member
    pub staff_id: StaffId,
    /// Confirmation timestamp
    pub confirmed_at: DateTime<Utc>,
    /// Status the record must still hold for the update to apply
    pub expected_status: RequestStatus,
    /// Status after the confirmation
    pub new_status: RequestStatus,
}

impl ConfirmationPlan {
    /// Whether this plan completes the dual confirmation
    pub fn completes_request(&self) -> bool {
        self.new_status == RequestStatus::Done
    }
}

/// A validated, not-yet-applied rejection
#[derive(Debug, Clone)]
pub struct RejectionPlan {
    /// Request being rejected
    pub request_id: RequestId,
    /// Rejecting staff member
    pub staff_id: StaffId,
    /// Rejection timestamp
    pub rejected_at: DateTime<Utc>,
    /// Free-text reason, stored verbatim
    pub reason: String,
    /// Status the record must still hold for the update to apply
    pub expected_status: RequestStatus,
}

/// A pharmacogenomic test request
///
/// Owned exclusively by the workflow: created by request intake, mutated only
/// through planned transitions, never deleted here.
///
/// Invariant: the status always reflects the confirmer slots. No confirmations
/// recorded means `pending` or `need_2_confirmation`; exactly one means
/// `need_1_confirmation`; two distinct confirmers mean `done`. The same staff
/// identity never occupies both slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRequest {
    /// Unique identifier
    pub id: RequestId,

    /// Patient this test belongs to
    pub patient_id: PatientId,

    /// Pharmacogene under test
    pub test_target: GeneSymbol,

    /// Specimen type, e.g. "EDTA whole blood", "buccal swab"
    pub specimen: String,

    /// Lifecycle status
    pub status: RequestStatus,

    /// First confirmer, if any
    pub confirmed_by_1: Option<StaffId>,

    /// Timestamp of the first confirmation
    pub confirmed_at_1: Option<DateTime<Utc>>,

    /// Second confirmer, if any
    pub confirmed_by_2: Option<StaffId>,

    /// Timestamp of the second confirmation
    pub confirmed_at_2: Option<DateTime<Utc>>,

    /// Rejecting staff member, if rejected
    pub rejected_by: Option<StaffId>,

    /// Timestamp of the rejection
    pub rejected_at: Option<DateTime<Utc>>,

    /// Free-text rejection reason, stored verbatim
    pub rejection_reason: Option<String>,

    /// Observed allele values, present once a pharmacist has entered them
    pub allele_data: Option<AlleleObservations>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl TestRequest {
    /// Number of confirmer slots currently filled
    pub fn confirmation_count(&self) -> usize {
        usize::from(self.confirmed_by_1.is_some()) + usize::from(self.confirmed_by_2.is_some())
    }

    /// Whether the given staff member already occupies a confirmer slot
    pub fn is_confirmed_by(&self, staff_id: &StaffId) -> bool {
        self.confirmed_by_1.as_ref() == Some(staff_id)
            || self.confirmed_by_2.as_ref() == Some(staff_id)
    }

    /// Plans a confirmation by the given staff member
    ///
    /// Checks every precondition without mutating anything:
    ///
    /// - `pending` requests deny with [`WorkflowError::AlleleDataMissing`]
    /// - rejected requests deny with [`WorkflowError::AlreadyRejected`]
    /// - a staff member already in a slot denies with [`WorkflowError::AlreadyConfirmed`]
    /// - a fully confirmed request denies with [`WorkflowError::FullyConfirmed`]
    ///
    /// On success returns the [`ConfirmationPlan`] filling the first empty
    /// slot, with the status transition the datastore must assert.
    pub fn plan_confirmation(
        &self,
        staff_id: &StaffId,
        now: DateTime<Utc>,
    ) -> Result<ConfirmationPlan, WorkflowError> {
        match self.status {
            RequestStatus::Pending => return Err(WorkflowError::AlleleDataMissing),
            RequestStatus::Rejected => return Err(WorkflowError::AlreadyRejected),
            RequestStatus::Done => return Err(WorkflowError::FullyConfirmed),
            RequestStatus::NeedTwoConfirmations | RequestStatus::NeedOneConfirmation => {}
        }

        if self.is_confirmed_by(staff_id) {
            return Err(WorkflowError::AlreadyConfirmed(staff_id.clone()));
        }

        // First-empty-wins: slots are ordered, not interchangeable.
        let (slot, new_status) = if self.confirmed_by_1.is_none() {
            (ConfirmerSlot::First, RequestStatus::NeedOneConfirmation)
        } else if self.confirmed_by_2.is_none() {
            (ConfirmerSlot::Second, RequestStatus::Done)
        } else {
            return Err(WorkflowError::FullyConfirmed);
        };

        Ok(ConfirmationPlan {
            request_id: self.id.clone(),
            slot,
            staff_id: staff_id.clone(),
            confirmed_at: now,
            expected_status: self.status,
            new_status,
        })
    }

    /// Plans a rejection by the given staff member
    ///
    /// Allowed from any non-terminal status, regardless of how many
    /// confirmations have been recorded. The reason is stored verbatim.
    pub fn plan_rejection(
        &self,
        staff_id: &StaffId,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<RejectionPlan, WorkflowError> {
        match self.status {
            RequestStatus::Done => return Err(WorkflowError::AlreadyCompleted),
            RequestStatus::Rejected => return Err(WorkflowError::AlreadyRejected),
            _ => {}
        }

        Ok(RejectionPlan {
            request_id: self.id.clone(),
            staff_id: staff_id.clone(),
            rejected_at: now,
            reason: reason.into(),
            expected_status: self.status,
        })
    }

    /// Applies a confirmation plan to an in-memory copy of the record
    ///
    /// The in-memory datastore and tests use this; the REST adapter expresses
    /// the same mutation as a filtered UPDATE.
    pub fn apply_confirmation(&mut self, plan: &ConfirmationPlan) {
        match plan.slot {
            ConfirmerSlot::First => {
                self.confirmed_by_1 = Some(plan.staff_id.clone());
                self.confirmed_at_1 = Some(plan.confirmed_at);
            }
            ConfirmerSlot::Second => {
                self.confirmed_by_2 = Some(plan.staff_id.clone());
                self.confirmed_at_2 = Some(plan.confirmed_at);
            }
        }
        self.status = plan.new_status;
        self.updated_at = plan.confirmed_at;
    }

    /// Applies a rejection plan to an in-memory copy of the record
    pub fn apply_rejection(&mut self, plan: &RejectionPlan) {
        self.rejected_by = Some(plan.staff_id.clone());
        self.rejected_at = Some(plan.rejected_at);
        self.rejection_reason = Some(plan.reason.clone());
        self.status = RequestStatus::Rejected;
        self.updated_at = plan.rejected_at;
    }

    /// Attaches allele observations to an in-memory copy of the record
    ///
    /// Moves the status from `pending` to `need_2_confirmation`.
    pub fn attach_alleles(&mut self, observations: AlleleObservations, now: DateTime<Utc>) {
        self.allele_data = Some(observations);
        self.status = RequestStatus::NeedTwoConfirmations;
        self.updated_at = now;
    }
}

/// Builder for creating TestRequest instances
///
/// A request built without allele data starts `pending`; supplying allele
/// data at creation time starts it directly at `need_2_confirmation` (the
/// intake flow where the technician already has the calls in hand).
pub struct TestRequestBuilder {
    id: Option<RequestId>,
    patient_id: PatientId,
    test_target: GeneSymbol,
    specimen: String,
    allele_data: Option<AlleleObservations>,
    created_at: Option<DateTime<Utc>>,
}

impl TestRequestBuilder {
    /// Create a new builder with the required intake fields
    pub fn new(patient_id: PatientId, test_target: GeneSymbol, specimen: impl Into<String>) -> Self {
        Self {
            id: None,
            patient_id,
            test_target,
            specimen: specimen.into(),
            allele_data: None,
            created_at: None,
        }
    }

    /// Set an explicit request ID (a fresh one is generated otherwise)
    pub fn id(mut self, id: RequestId) -> Self {
        self.id = Some(id);
        self
    }

    /// Supply allele observations at creation time
    pub fn allele_data(mut self, observations: AlleleObservations) -> Self {
        self.allele_data = Some(observations);
        self
    }

    /// Set an explicit creation timestamp (now otherwise)
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Build the TestRequest instance
    pub fn build(self) -> TestRequest {
        let created_at = self.created_at.unwrap_or_else(Utc::now);
        let status = if self.allele_data.is_some() {
            RequestStatus::NeedTwoConfirmations
        } else {
            RequestStatus::Pending
        };

        TestRequest {
            id: self.id.unwrap_or_else(RequestId::generate),
            patient_id: self.patient_id,
            test_target: self.test_target,
            specimen: self.specimen,
            status,
            confirmed_by_1: None,
            confirmed_at_1: None,
            confirmed_by_2: None,
            confirmed_at_2: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
            allele_data: self.allele_data,
            created_at,
            updated_at: created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_request(with_alleles: bool) -> TestRequest {
        let builder = TestRequestBuilder::new(
            PatientId::new("MRN-001").unwrap(),
            GeneSymbol::new("CYP2D6").unwrap(),
            "EDTA whole blood",
        );
        if with_alleles {
            builder
                .allele_data(AlleleObservations::from_pairs([("*10", "C/C")]))
                .build()
        } else {
            builder.build()
        }
    }

    fn staff(name: &str) -> StaffId {
        StaffId::new(name).unwrap()
    }

    #[test]
    fn test_builder_without_alleles_starts_pending() {
        let request = build_request(false);
        assert_eq!(request.status, RequestStatus::Pending);
        assert!(request.allele_data.is_none());
        assert_eq!(request.confirmation_count(), 0);
    }

    #[test]
    fn test_builder_with_alleles_starts_need_two() {
        let request = build_request(true);
        assert_eq!(request.status, RequestStatus::NeedTwoConfirmations);
        assert!(request.allele_data.is_some());
    }

    #[test]
    fn test_confirm_pending_denied() {
        let request = build_request(false);
        let err = request.plan_confirmation(&staff("alice"), Utc::now()).unwrap_err();
        assert!(matches!(err, WorkflowError::AlleleDataMissing));
    }

    #[test]
    fn test_first_confirmation_fills_first_slot() {
        let mut request = build_request(true);
        let plan = request.plan_confirmation(&staff("alice"), Utc::now()).unwrap();
        assert_eq!(plan.slot, ConfirmerSlot::First);
        assert_eq!(plan.expected_status, RequestStatus::NeedTwoConfirmations);
        assert_eq!(plan.new_status, RequestStatus::NeedOneConfirmation);
        assert!(!plan.completes_request());

        request.apply_confirmation(&plan);
        assert_eq!(request.status, RequestStatus::NeedOneConfirmation);
        assert_eq!(request.confirmed_by_1, Some(staff("alice")));
        assert!(request.confirmed_by_2.is_none());
    }

    #[test]
    fn test_same_staff_cannot_confirm_twice() {
        let mut request = build_request(true);
        let plan = request.plan_confirmation(&staff("alice"), Utc::now()).unwrap();
        request.apply_confirmation(&plan);

        let err = request.plan_confirmation(&staff("alice"), Utc::now()).unwrap_err();
        assert!(matches!(err, WorkflowError::AlreadyConfirmed(_)));
        // No state change
        assert_eq!(request.status, RequestStatus::NeedOneConfirmation);
    }

    #[test]
    fn test_second_confirmation_completes() {
        let mut request = build_request(true);
        let plan = request.plan_confirmation(&staff("alice"), Utc::now()).unwrap();
        request.apply_confirmation(&plan);

        let plan = request.plan_confirmation(&staff("bob"), Utc::now()).unwrap();
        assert_eq!(plan.slot, ConfirmerSlot::Second);
        assert!(plan.completes_request());
        request.apply_confirmation(&plan);

        assert_eq!(request.status, RequestStatus::Done);
        assert_eq!(request.confirmed_by_2, Some(staff("bob")));
        assert_eq!(request.confirmation_count(), 2);
    }

    #[test]
    fn test_third_confirmation_denied() {
        let mut request = build_request(true);
        let plan = request.plan_confirmation(&staff("alice"), Utc::now()).unwrap();
        request.apply_confirmation(&plan);
        let plan = request.plan_confirmation(&staff("bob"), Utc::now()).unwrap();
        request.apply_confirmation(&plan);

        let err = request.plan_confirmation(&staff("carol"), Utc::now()).unwrap_err();
        assert!(matches!(err, WorkflowError::FullyConfirmed));
    }

    #[test]
    fn test_rejected_request_never_confirmable() {
        let mut request = build_request(true);
        let rejection = request
            .plan_rejection(&staff("alice"), "sample degraded", Utc::now())
            .unwrap();
        request.apply_rejection(&rejection);

        assert_eq!(request.status, RequestStatus::Rejected);
        assert_eq!(request.rejection_reason.as_deref(), Some("sample degraded"));

        for name in ["alice", "bob", "carol"] {
            let err = request.plan_confirmation(&staff(name), Utc::now()).unwrap_err();
            assert!(matches!(err, WorkflowError::AlreadyRejected));
        }
    }

    #[test]
    fn test_reject_allowed_mid_confirmation() {
        let mut request = build_request(true);
        let plan = request.plan_confirmation(&staff("alice"), Utc::now()).unwrap();
        request.apply_confirmation(&plan);

        let rejection = request
            .plan_rejection(&staff("bob"), "specimen mislabeled", Utc::now())
            .unwrap();
        assert_eq!(rejection.expected_status, RequestStatus::NeedOneConfirmation);
        request.apply_rejection(&rejection);
        assert_eq!(request.status, RequestStatus::Rejected);
    }

    #[test]
    fn test_reject_denied_on_terminal_states() {
        let mut request = build_request(true);
        let plan = request.plan_confirmation(&staff("alice"), Utc::now()).unwrap();
        request.apply_confirmation(&plan);
        let plan = request.plan_confirmation(&staff("bob"), Utc::now()).unwrap();
        request.apply_confirmation(&plan);

        let err = request
            .plan_rejection(&staff("carol"), "too late", Utc::now())
            .unwrap_err();
        assert!(matches!(err, WorkflowError::AlreadyCompleted));
    }

    #[test]
    fn test_attach_alleles_moves_to_need_two() {
        let mut request = build_request(false);
        request.attach_alleles(AlleleObservations::from_pairs([("*4", "G/A")]), Utc::now());
        assert_eq!(request.status, RequestStatus::NeedTwoConfirmations);
        assert_eq!(
            request.allele_data.as_ref().unwrap().get("*4"),
            Some("G/A")
        );
    }

    #[test]
    fn test_status_serialization_wire_names() {
        let json = serde_json::to_string(&RequestStatus::NeedTwoConfirmations).unwrap();
        assert_eq!(json, "\"need_2_confirmation\"");
        let status: RequestStatus = serde_json::from_str("\"reject\"").unwrap();
        assert_eq!(status, RequestStatus::Rejected);
    }

    #[test]
    fn test_request_serialization_round_trip() {
        let request = build_request(true);
        let json = serde_json::to_string(&request).unwrap();
        let deserialized: TestRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.id, request.id);
        assert_eq!(deserialized.status, request.status);
        assert_eq!(deserialized.allele_data, request.allele_data);
    }
}
