//! Tests for the registration service.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::MockRegistrationRepository;
use crate::domain::{
    DISCORD_ID_FIELD, EMAIL_FIELD, EmailAddress, ErrorCode, RegistrationId, messages,
};

fn make_service(repo: MockRegistrationRepository) -> RegistrationService<MockRegistrationRepository> {
    RegistrationService::new(Arc::new(repo))
}

fn payload(value: Value) -> RegistrationPayload {
    RegistrationPayload::try_from(value).expect("object payload")
}

fn stored(draft: &RegistrationDraft) -> Registration {
    let created_at = Utc
        .with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp");
    draft
        .clone()
        .into_registration(RegistrationId::random(), created_at)
}

fn email(raw: &str) -> EmailAddress {
    EmailAddress::parse(raw).expect("valid email")
}

fn expect_field_errors(result: Result<Registration, RegistrationError>) -> FieldErrors {
    match result {
        Err(RegistrationError::Invalid(errors)) => errors,
        other => panic!("expected field errors, got {other:?}"),
    }
}

#[tokio::test]
async fn register_stores_valid_payload() {
    let mut repo = MockRegistrationRepository::new();
    repo.expect_exists_by_email()
        .with(eq(email("ada@example.com")))
        .times(1)
        .return_once(|_| Ok(false));
    repo.expect_insert()
        .times(1)
        .returning(|draft| Ok(stored(draft)));

    let service = make_service(repo);
    let registration = service
        .register(payload(json!({
            "email": "Ada@Example.com",
            "discord_id": "ada#1815",
        })))
        .await
        .expect("registration succeeds");

    assert_eq!(registration.email().as_str(), "ada@example.com");
    assert_eq!(registration.discord_id(), Some("ada#1815"));
    assert_eq!(registration.referral_source(), None);
}

#[rstest]
#[case(json!({}), messages::REQUIRED)]
#[case(json!({ "email": "not-an-email" }), messages::INVALID_EMAIL)]
#[tokio::test]
async fn register_rejects_invalid_payload_without_touching_store(
    #[case] body: Value,
    #[case] message: &str,
) {
    let mut repo = MockRegistrationRepository::new();
    repo.expect_exists_by_email().never();
    repo.expect_insert().never();

    let errors = expect_field_errors(make_service(repo).register(payload(body)).await);
    assert!(errors.contains(EMAIL_FIELD, message));
}

#[tokio::test]
async fn register_reports_duplicate_found_by_pre_check() {
    let mut repo = MockRegistrationRepository::new();
    repo.expect_exists_by_email()
        .times(1)
        .return_once(|_| Ok(true));
    repo.expect_insert().never();

    let errors = expect_field_errors(
        make_service(repo)
            .register(payload(json!({ "email": "a@example.com" })))
            .await,
    );
    assert_eq!(errors, FieldErrors::duplicate_email());
}

#[rstest]
#[case(true, &[DISCORD_ID_FIELD, EMAIL_FIELD])]
#[case(false, &[DISCORD_ID_FIELD])]
#[tokio::test]
async fn register_checks_uniqueness_alongside_other_field_failures(
    #[case] taken: bool,
    #[case] expected_fields: &[&str],
) {
    let mut repo = MockRegistrationRepository::new();
    repo.expect_exists_by_email()
        .with(eq(email("dup@example.com")))
        .times(1)
        .return_once(move |_| Ok(taken));
    repo.expect_insert().never();

    let errors = expect_field_errors(
        make_service(repo)
            .register(payload(json!({
                "email": "dup@example.com",
                "discord_id": { "x": 1 },
            })))
            .await,
    );
    assert_eq!(errors.fields().collect::<Vec<_>>(), expected_fields);
    assert!(errors.contains(DISCORD_ID_FIELD, messages::NOT_A_STRING));
    assert_eq!(errors.contains(EMAIL_FIELD, messages::DUPLICATE_EMAIL), taken);
}

#[tokio::test]
async fn register_maps_lost_race_to_duplicate_email() {
    let mut repo = MockRegistrationRepository::new();
    repo.expect_exists_by_email()
        .times(1)
        .return_once(|_| Ok(false));
    repo.expect_insert().times(1).return_once(|draft| {
        Err(RegistrationPersistenceError::duplicate_email(
            draft.email().as_str(),
        ))
    });

    let errors = expect_field_errors(
        make_service(repo)
            .register(payload(json!({ "email": "a@example.com" })))
            .await,
    );
    assert_eq!(errors, FieldErrors::duplicate_email());
}

#[rstest]
#[case(
    RegistrationPersistenceError::connection("refused"),
    ErrorCode::ServiceUnavailable
)]
#[case(RegistrationPersistenceError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn register_surfaces_store_failures_as_unavailable(
    #[case] failure: RegistrationPersistenceError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockRegistrationRepository::new();
    repo.expect_exists_by_email()
        .times(1)
        .return_once(|_| Ok(false));
    repo.expect_insert()
        .times(1)
        .return_once(move |_| Err(failure));

    let result = make_service(repo)
        .register(payload(json!({ "email": "a@example.com" })))
        .await;
    match result {
        Err(RegistrationError::Unavailable(error)) => assert_eq!(error.code(), expected),
        other => panic!("expected store failure, got {other:?}"),
    }
}

#[tokio::test]
async fn validate_propagates_pre_check_failures() {
    let mut repo = MockRegistrationRepository::new();
    repo.expect_exists_by_email()
        .times(1)
        .return_once(|_| Err(RegistrationPersistenceError::connection("pool timeout")));

    let result = make_service(repo)
        .validate(&payload(json!({ "email": "a@example.com" })))
        .await;
    match result {
        Err(RegistrationError::Unavailable(error)) => {
            assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
        }
        other => panic!("expected store failure, got {other:?}"),
    }
}

#[tokio::test]
async fn count_returns_store_total() {
    let mut repo = MockRegistrationRepository::new();
    repo.expect_count().times(1).return_once(|| Ok(42));

    let count = make_service(repo).count().await.expect("count succeeds");
    assert_eq!(count, 42);
}

#[tokio::test]
async fn count_maps_connection_failure_to_service_unavailable() {
    let mut repo = MockRegistrationRepository::new();
    repo.expect_count()
        .times(1)
        .return_once(|| Err(RegistrationPersistenceError::connection("refused")));

    let err = make_service(repo).count().await.expect_err("count fails");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn list_forwards_window() {
    let window = ListWindow {
        limit: 5,
        offset: 10,
    };
    let mut repo = MockRegistrationRepository::new();
    repo.expect_list()
        .with(eq(window))
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    let records = make_service(repo).list(window).await.expect("list succeeds");
    assert!(records.is_empty());
}
