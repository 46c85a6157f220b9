//! Domain primitives, services and ports.
//!
//! Purpose: define the registration model and its use-cases independently of
//! HTTP and SQL. Adapters in [`crate::inbound`] and [`crate::outbound`] depend
//! on this module, never the reverse.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure envelope.
//! - [`TraceId`]: request correlation identifier.
//! - [`RegistrationPayload`], [`RegistrationDraft`], [`Registration`],
//!   [`EmailAddress`], [`FieldErrors`]: the registration model.
//! - [`PayloadCheck`] / [`validate_payload`]: pure field validation.
//! - [`RegistrationService`]: validator and store orchestration.

pub mod error;
pub mod ports;
pub mod registration;
pub mod registration_service;
pub mod trace_id;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::registration::{
    DISCORD_ID_FIELD, EMAIL_FIELD, EMAIL_MAX_LENGTH, EmailAddress, EmailValidationError,
    FieldErrors, NON_FIELD_ERRORS, PayloadCheck, PayloadShapeError, REFERRAL_SOURCE_FIELD, Registration,
    RegistrationDraft, RegistrationId, RegistrationPayload, messages, validate_payload,
};
pub use self::registration_service::RegistrationService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
