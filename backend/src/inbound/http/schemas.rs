//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and never derive `ToSchema`. The
//! shadow types below mirror their JSON shape and register under the domain
//! type's name.

use std::collections::BTreeMap;

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// A dependency such as the database is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// Envelope used for server-side failures.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "service_unavailable")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "registration store unavailable")]
    message: String,
    /// Correlation identifier, also sent in the `trace-id` header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
}

/// OpenAPI schema for [`crate::domain::FieldErrors`].
///
/// Maps each rejected field name to its messages; `non_field_errors` carries
/// body-level problems.
#[derive(ToSchema)]
#[schema(
    as = crate::domain::FieldErrors,
    example = json!({"email": ["Enter a valid email address."]})
)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct FieldErrorsSchema(BTreeMap<String, Vec<String>>);
