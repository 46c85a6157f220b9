//! Registration API handlers.
//!
//! ```text
//! POST /api/register/ {"email":"ada@example.com","discord_id":"ada#1815"}
//! GET /api/users/count/
//! ```
//!
//! Both routes also answer without the trailing slash.

use std::collections::HashMap;

use actix_web::http::StatusCode;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{FieldErrors, NON_FIELD_ERRORS, RegistrationPayload};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, FieldErrorsSchema};
use crate::inbound::http::state::HttpState;

/// Confirmation text returned after a successful registration.
pub const REGISTRATION_SUCCESS_MESSAGE: &str = "Registration successful!";

const JSON_MEDIA_TYPE: &str = "application/json";
const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";

/// Request body for `POST /api/register/`, as JSON or form fields.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RegistrationRequest {
    /// Contact address; compared case-insensitively for uniqueness.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Discord account identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "ada#1815")]
    pub discord_id: Option<String>,
    /// How the user heard about the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "newsletter")]
    pub referral_source: Option<String>,
}

/// Body of a `201 Created` registration response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct RegistrationCreated {
    #[schema(example = "Registration successful!")]
    pub message: String,
}

/// Body returned when the request body cannot be read at all.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct ErrorDetail {
    #[schema(example = "JSON parse error - EOF while parsing a value at line 1 column 9")]
    pub detail: String,
}

/// Body of the count response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct RegistrationCount {
    pub count: u64,
}

/// Reasons a request body cannot be turned into a field map.
#[derive(Debug, thiserror::Error)]
enum BodyError {
    #[error("JSON parse error - {0}")]
    Malformed(String),
    #[error("Unsupported media type \"{0}\" in request.")]
    UnsupportedMediaType(String),
    /// Well-formed JSON that is not an object; reported like a field failure.
    #[error("{0}")]
    NotAnObject(FieldErrors),
}

impl ResponseError for BodyError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Malformed(_) | Self::NotAnObject(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        match self {
            Self::NotAnObject(errors) => builder.json(errors),
            Self::Malformed(_) | Self::UnsupportedMediaType(_) => builder.json(ErrorDetail {
                detail: self.to_string(),
            }),
        }
    }
}

/// Decode the request body into a field map according to its content type.
///
/// An empty body decodes to an empty payload so that field validation
/// reports what is missing.
fn parse_body(req: &HttpRequest, body: &[u8]) -> Result<RegistrationPayload, BodyError> {
    if body.is_empty() {
        return Ok(RegistrationPayload::default());
    }

    let media_type = req.content_type().to_ascii_lowercase();
    if media_type == JSON_MEDIA_TYPE || media_type.ends_with("+json") {
        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|err| BodyError::Malformed(err.to_string()))?;
        return RegistrationPayload::try_from(value).map_err(|err| {
            BodyError::NotAnObject(FieldErrors::single(NON_FIELD_ERRORS, err.to_string()))
        });
    }
    if media_type == FORM_MEDIA_TYPE {
        let fields: HashMap<String, String> =
            url::form_urlencoded::parse(body).into_owned().collect();
        return Ok(RegistrationPayload::from_form(fields));
    }

    Err(BodyError::UnsupportedMediaType(req.content_type().to_owned()))
}

/// Register a user on the waitlist.
///
/// Accepts JSON or form-encoded bodies. Field failures, including a duplicate
/// email, return a map from field name to messages. A body that cannot be
/// decoded returns `{"detail": ...}`.
#[utoipa::path(
    post,
    path = "/api/register/",
    request_body = RegistrationRequest,
    responses(
        (status = 201, description = "Registration stored", body = RegistrationCreated),
        (status = 400, description = "Validation failed; malformed JSON returns `ErrorDetail` instead", body = FieldErrorsSchema),
        (status = 415, description = "Unsupported content type", body = ErrorDetail),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Registration store unavailable", body = ErrorSchema)
    ),
    tags = ["registrations"],
    operation_id = "createRegistration"
)]
pub async fn create_registration(
    state: web::Data<HttpState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, actix_web::Error> {
    let payload = parse_body(&req, &body).inspect_err(|error| {
        debug!(%error, "registration body rejected");
    })?;
    state.registrations.register(payload).await?;
    Ok(HttpResponse::Created().json(RegistrationCreated {
        message: REGISTRATION_SUCCESS_MESSAGE.to_owned(),
    }))
}

/// Total number of registrations.
#[utoipa::path(
    get,
    path = "/api/users/count/",
    responses(
        (status = 200, description = "Registration count", body = RegistrationCount),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Registration store unavailable", body = ErrorSchema)
    ),
    tags = ["registrations"],
    operation_id = "registrationCount"
)]
pub async fn registration_count(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<RegistrationCount>> {
    let count = state.registrations_query.count().await?;
    Ok(web::Json(RegistrationCount { count }))
}

/// Mount the registration routes.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use waitlist::inbound::http::registrations;
///
/// let app = App::new().configure(registrations::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(["/api/register/", "/api/register"])
            .route(web::post().to(create_registration)),
    )
    .service(
        web::resource(["/api/users/count/", "/api/users/count"])
            .route(web::get().to(registration_count)),
    );
}
