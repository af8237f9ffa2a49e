//! Tests for the domain error payload and its constructors.

use super::*;
use crate::domain::trace_id::TraceId;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("bad")
}

#[rstest]
fn invalid_request_constructor_sets_code() {
    let err = Error::invalid_request("bad");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values(base_error: Error) {
    let result = base_error.try_with_trace_id("   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::forbidden("denied") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
#[tokio::test]
async fn try_from_error_dto_clears_ambient_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let dto = ErrorDto {
        code: ErrorCode::InvalidRequest,
        message: "bad".to_string(),
        trace_id: None,
        details: None,
    };

    let error = TraceId::scope(trace_id, async move {
        Error::try_from(dto).expect("conversion succeeds for valid payload without trace")
    })
    .await;

    assert!(error.trace_id().is_none());
}

#[rstest]
fn record_not_found_names_kind_and_id() {
    let err = Error::record_not_found(ResourceKind::Pet, 42);
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "pet 42 not found");
    assert_eq!(err.details(), Some(&json!({ "kind": "pet", "id": "42" })));
}

#[rstest]
fn invalid_field_names_field_and_constraint() {
    let err = Error::invalid_field("date", "must be in the future");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "date: must be in the future");
    assert_eq!(
        err.details(),
        Some(&json!({ "field": "date", "constraint": "must be in the future" }))
    );
}

#[rstest]
fn duplicate_names_kind_and_key() {
    let err = Error::duplicate(ResourceKind::VaccinationRecord, "pet 3/adulto");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(
        err.details(),
        Some(&json!({ "kind": "vaccination record", "key": "pet 3/adulto" }))
    );
}

#[rstest]
fn serialises_camel_case_payload(expected_trace_id: String) {
    let err = Error::conflict("taken")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "key": "ana@clinic.mx" }));
    let value = serde_json::to_value(&err).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "code": "conflict",
            "message": "taken",
            "traceId": expected_trace_id,
            "details": { "key": "ana@clinic.mx" },
        })
    );
}

#[rstest]
fn deserialisation_rejects_blank_message() {
    let result = serde_json::from_value::<Error>(json!({ "code": "not_found", "message": " " }));
    assert!(result.is_err());
}
