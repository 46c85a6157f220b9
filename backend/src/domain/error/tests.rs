//! Construction and serialisation rules for the error envelope.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn internal_error() -> Error {
    Error::internal("pool exhausted while counting").with_trace_id(TRACE_ID)
}

#[rstest]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn shorthand_constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_blank_messages() {
    let result = Error::try_new(ErrorCode::InternalError, "   ");
    assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
}

#[rstest]
fn try_with_trace_id_rejects_blank_values() {
    let result = Error::service_unavailable("down").try_with_trace_id(" ");
    assert_eq!(result, Err(ErrorValidationError::EmptyTraceId));
}

#[rstest]
fn trace_id_is_absent_outside_request_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn trace_id_is_captured_from_scope() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid uuid");
    let error = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn redacted_hides_internal_message(internal_error: Error) {
    let redacted = internal_error.redacted();
    assert_eq!(redacted.message(), "Internal server error");
    assert_eq!(redacted.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn redacted_keeps_client_errors_intact() {
    let error = Error::service_unavailable("database offline");
    assert_eq!(error.redacted(), error);
}

#[rstest]
fn serialises_with_camel_case_trace_id(internal_error: Error) {
    let value = serde_json::to_value(&internal_error).expect("serialise error");
    assert_eq!(value["code"], "internal_error");
    assert_eq!(value["traceId"], TRACE_ID);
    assert_eq!(value["message"], "pool exhausted while counting");
}

#[rstest]
fn deserialisation_accepts_snake_case_trace_id() {
    let error: Error = serde_json::from_value(json!({
        "code": "service_unavailable",
        "message": "database offline",
        "trace_id": TRACE_ID,
    }))
    .expect("deserialise error");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn deserialisation_rejects_blank_messages() {
    let result = serde_json::from_value::<Error>(json!({
        "code": "internal_error",
        "message": "",
    }));
    assert!(result.is_err());
}
