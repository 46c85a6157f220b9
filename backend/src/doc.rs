//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the registration endpoints, the health probes and
//! the schema shadows from [`crate::inbound::http::schemas`]. Swagger UI
//! serves it in debug builds and `cargo run --bin openapi-dump` exports it.

use utoipa::OpenApi;

use crate::inbound::http::registrations::{
    ErrorDetail, RegistrationCount, RegistrationCreated, RegistrationRequest,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, FieldErrorsSchema};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Waitlist registration API",
        description = "Capture waitlist sign-ups and report how many have been collected."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::registrations::create_registration,
        crate::inbound::http::registrations::registration_count,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        RegistrationRequest,
        RegistrationCreated,
        RegistrationCount,
        ErrorDetail,
        FieldErrorsSchema,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "registrations", description = "Waitlist sign-ups"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
