//! REST datastore adapter against a mock row API
//!
//! Exercises the conditional-update wire contract: the WHERE clause asserts
//! the expected prior state, and an empty result set maps to a failed
//! precondition rather than an error.

use chrono::Utc;
use mendel::adapters::datastore::traits::{ReportStore, RequestStore, StaffDirectory};
use mendel::adapters::datastore::RestDatastore;
use mendel::config::schema::{DatastoreConfig, RetryConfig};
use mendel::domain::ids::{RequestId, StaffId};
use mendel::domain::request::{
    AlleleObservations, ConfirmationPlan, ConfirmerSlot, RequestStatus,
};

fn adapter_for(server: &mockito::Server) -> RestDatastore {
    RestDatastore::new(DatastoreConfig {
        base_url: server.url(),
        api_key: "test-key".to_string(),
        timeout_seconds: 5,
        retry: RetryConfig {
            max_retries: 1,
            initial_delay_ms: 1,
            backoff_multiplier: 1.0,
            max_delay_ms: 2,
        },
    })
}

fn request_row(status: &str, confirmed_by_1: Option<&str>) -> String {
    format!(
        r#"{{
            "id": "req-1",
            "patient_id": "MRN-42",
            "test_target": "CYP2D6",
            "specimen": "EDTA whole blood",
            "status": "{status}",
            "confirmed_by_1": {},
            "confirmed_at_1": {},
            "confirmed_by_2": null,
            "confirmed_at_2": null,
            "rejected_by": null,
            "rejected_at": null,
            "rejection_reason": null,
            "allele_data": {{"*10": "C/C"}},
            "created_at": "2025-11-01T09:00:00Z",
            "updated_at": "2025-11-01T09:00:00Z"
        }}"#,
        confirmed_by_1.map_or("null".to_string(), |s| format!("\"{s}\"")),
        confirmed_by_1.map_or("null".to_string(), |_| "\"2025-11-02T08:30:00Z\"".to_string()),
    )
}

#[tokio::test]
async fn confirmation_update_filters_on_status_and_empty_slot() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock(
            "PATCH",
            "/rest/v1/test_requests?id=eq.req-1&status=eq.need_2_confirmation&confirmed_by_1=is.null",
        )
        .match_header("apikey", "test-key")
        .match_header("prefer", "return=representation")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            "[{}]",
            request_row("need_1_confirmation", Some("alice"))
        ))
        .create_async()
        .await;

    let adapter = adapter_for(&server);
    let plan = ConfirmationPlan {
        request_id: RequestId::new("req-1").unwrap(),
        slot: ConfirmerSlot::First,
        staff_id: StaffId::new("alice").unwrap(),
        confirmed_at: Utc::now(),
        expected_status: RequestStatus::NeedTwoConfirmations,
        new_status: RequestStatus::NeedOneConfirmation,
    };

    let outcome = adapter.apply_confirmation(&plan).await.unwrap();
    mock.assert_async().await;

    match outcome {
        mendel::adapters::datastore::ConditionalUpdate::Applied(request) => {
            assert_eq!(request.status, RequestStatus::NeedOneConfirmation);
            assert_eq!(
                request.confirmed_by_1,
                Some(StaffId::new("alice").unwrap())
            );
        }
        _ => panic!("expected applied update"),
    }
}

#[tokio::test]
async fn second_slot_update_uses_second_slot_filter() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock(
            "PATCH",
            "/rest/v1/test_requests?id=eq.req-1&status=eq.need_1_confirmation&confirmed_by_2=is.null",
        )
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let adapter = adapter_for(&server);
    let plan = ConfirmationPlan {
        request_id: RequestId::new("req-1").unwrap(),
        slot: ConfirmerSlot::Second,
        staff_id: StaffId::new("bob").unwrap(),
        confirmed_at: Utc::now(),
        expected_status: RequestStatus::NeedOneConfirmation,
        new_status: RequestStatus::Done,
    };

    let outcome = adapter.apply_confirmation(&plan).await.unwrap();
    mock.assert_async().await;
    assert!(!outcome.was_applied());
}

#[tokio::test]
async fn store_alleles_asserts_pending_status() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock(
            "PATCH",
            "/rest/v1/test_requests?id=eq.req-1&status=eq.pending",
        )
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!("[{}]", request_row("need_2_confirmation", None)))
        .create_async()
        .await;

    let adapter = adapter_for(&server);
    let outcome = adapter
        .store_alleles(
            &RequestId::new("req-1").unwrap(),
            &AlleleObservations::from_pairs([("*10", "C/C")]),
            RequestStatus::Pending,
            RequestStatus::NeedTwoConfirmations,
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(outcome.was_applied());
}

#[tokio::test]
async fn report_pointer_update_requires_existing_row() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("PATCH", "/rest/v1/reports?request_id=eq.req-9")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let adapter = adapter_for(&server);
    let result = adapter
        .update_pdf_path(
            &RequestId::new("req-9").unwrap(),
            "https://cdn.example.com/reports/req-9.pdf",
        )
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn staff_lookup_not_found_is_none() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/rest/v1/staff?id=eq.nobody&select=*")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let adapter = adapter_for(&server);
    let staff = adapter
        .get_staff(&StaffId::new("nobody").unwrap())
        .await
        .unwrap();
    assert!(staff.is_none());
}
