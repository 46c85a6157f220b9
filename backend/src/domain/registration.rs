//! Registration data model and the pure payload validator.
//!
//! A sign-up arrives as an untyped [`RegistrationPayload`]. The validator
//! turns it into a [`RegistrationDraft`] (valid, normalised, not yet stored)
//! or a [`FieldErrors`] set keyed by field name. Stores turn drafts into
//! [`Registration`] records by assigning an identifier and a timestamp.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Payload key holding the email address.
pub const EMAIL_FIELD: &str = "email";
/// Payload key holding the Discord account identifier.
pub const DISCORD_ID_FIELD: &str = "discord_id";
/// Payload key holding the free-text referral source.
pub const REFERRAL_SOURCE_FIELD: &str = "referral_source";
/// Error key used when the payload cannot be read as a mapping at all.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Maximum accepted length of a whole email address.
pub const EMAIL_MAX_LENGTH: usize = 254;
const LOCAL_PART_MAX_LENGTH: usize = 64;

/// User-facing validation messages.
pub mod messages {
    /// The field was not supplied.
    pub const REQUIRED: &str = "This field is required.";
    /// The field was supplied as `null`.
    pub const NULL: &str = "This field may not be null.";
    /// The field was empty once trimmed.
    pub const BLANK: &str = "This field may not be blank.";
    /// The address exceeds [`EMAIL_MAX_LENGTH`](super::EMAIL_MAX_LENGTH).
    pub const TOO_LONG: &str = "Ensure this field has no more than 254 characters.";
    /// The value is not a syntactically valid email address.
    pub const INVALID_EMAIL: &str = "Enter a valid email address.";
    /// Another registration already uses the address.
    pub const DUPLICATE_EMAIL: &str = "A registration with this email already exists.";
    /// A text field received a non-string value.
    pub const NOT_A_STRING: &str = "Not a valid string.";
}

/// Untyped inbound payload: a mapping from field name to JSON value.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use waitlist::domain::RegistrationPayload;
///
/// let payload = RegistrationPayload::try_from(json!({ "email": "a@example.com" }))
///     .expect("object payload");
/// assert!(payload.get("email").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationPayload(Map<String, Value>);

impl RegistrationPayload {
    /// Wrap an existing JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Build a payload from form-encoded fields; every value is a string.
    pub fn from_form(fields: HashMap<String, String>) -> Self {
        Self(
            fields
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect(),
        )
    }

    /// Look up a raw field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

/// Raised when a JSON body is not an object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid data. Expected a dictionary, but got {found}.")]
pub struct PayloadShapeError {
    found: &'static str,
}

impl TryFrom<Value> for RegistrationPayload {
    type Error = PayloadShapeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let found = match value {
            Value::Object(fields) => return Ok(Self(fields)),
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "str",
            Value::Array(_) => "list",
        };
        Err(PayloadShapeError { found })
    }
}

/// Ordered mapping from field name to validation messages.
///
/// Serialises as a plain JSON object, e.g.
/// `{"email": ["This field is required."]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding a single message for `field`.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// The error reported when the email is already registered.
    pub fn duplicate_email() -> Self {
        Self::single(EMAIL_FIELD, messages::DUPLICATE_EMAIL)
    }

    /// Append a message for `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    /// Messages recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Whether `field` carries `message`.
    pub fn contains(&self, field: &str, message: &str) -> bool {
        self.get(field)
            .is_some_and(|messages| messages.iter().any(|m| m == message))
    }

    /// Names of the fields with at least one message.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Whether no field failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Reasons an address fails syntactic validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    /// Empty once trimmed.
    #[error("email address must not be blank")]
    Blank,
    /// Longer than [`EMAIL_MAX_LENGTH`].
    #[error("email address must be at most {max} characters")]
    TooLong {
        /// The enforced limit.
        max: usize,
    },
    /// No `@` separator.
    #[error("email address must contain '@'")]
    MissingAt,
    /// The part before the final `@` is not a dot-atom.
    #[error("email local part is invalid")]
    InvalidLocalPart,
    /// The part after the final `@` is not a hostname or address literal.
    #[error("email domain is invalid")]
    InvalidDomain,
}

static LOCAL_PART_RE: OnceLock<Regex> = OnceLock::new();
static DOMAIN_LABEL_RE: OnceLock<Regex> = OnceLock::new();

fn local_part_regex() -> &'static Regex {
    LOCAL_PART_RE.get_or_init(|| {
        let pattern = r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email local part regex failed to compile: {error}"))
    })
}

fn domain_label_regex() -> &'static Regex {
    DOMAIN_LABEL_RE.get_or_init(|| {
        let pattern = r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("domain label regex failed to compile: {error}"))
    })
}

fn is_valid_domain(domain: &str) -> bool {
    if domain.eq_ignore_ascii_case("localhost") {
        return true;
    }
    if let Some(literal) = domain
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        return is_valid_address_literal(literal);
    }

    let labels: Vec<&str> = domain.split('.').collect();
    let Some(tld) = labels.last() else {
        return false;
    };
    labels.len() >= 2
        && labels.iter().all(|label| domain_label_regex().is_match(label))
        && tld.len() >= 2
        && !tld.chars().all(|c| c.is_ascii_digit())
}

fn is_valid_address_literal(literal: &str) -> bool {
    match literal.get(..5) {
        Some(prefix) if prefix.eq_ignore_ascii_case("ipv6:") => literal
            .get(5..)
            .is_some_and(|address| address.parse::<Ipv6Addr>().is_ok()),
        _ => literal.parse::<Ipv4Addr>().is_ok(),
    }
}

/// A syntactically valid email address in canonical (trimmed, lower-case)
/// form. Two addresses differing only in case compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and canonicalise `raw`.
    ///
    /// # Examples
    /// ```
    /// use waitlist::domain::EmailAddress;
    ///
    /// let email = EmailAddress::parse("  Ada@Example.COM ").expect("valid email");
    /// assert_eq!(email.as_str(), "ada@example.com");
    /// assert!(EmailAddress::parse("not-an-email").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, EmailValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EmailValidationError::Blank);
        }
        if trimmed.chars().count() > EMAIL_MAX_LENGTH {
            return Err(EmailValidationError::TooLong {
                max: EMAIL_MAX_LENGTH,
            });
        }
        let (local, domain) = trimmed
            .rsplit_once('@')
            .ok_or(EmailValidationError::MissingAt)?;
        if local.len() > LOCAL_PART_MAX_LENGTH || !local_part_regex().is_match(local) {
            return Err(EmailValidationError::InvalidLocalPart);
        }
        if !is_valid_domain(domain) {
            return Err(EmailValidationError::InvalidDomain);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Wrap a value already stored in canonical form.
    ///
    /// Used by persistence adapters reading rows written through
    /// [`EmailAddress::parse`]; no validation is repeated.
    pub fn from_canonical(value: String) -> Self {
        Self(value)
    }

    /// Borrow the canonical string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn normalise_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// A validated registration that has not been stored yet.
///
/// Optional text fields are trimmed; blank values become `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDraft {
    email: EmailAddress,
    discord_id: Option<String>,
    referral_source: Option<String>,
}

impl RegistrationDraft {
    /// Build a draft, normalising the optional fields.
    pub fn new(
        email: EmailAddress,
        discord_id: Option<String>,
        referral_source: Option<String>,
    ) -> Self {
        Self {
            email,
            discord_id: normalise_optional_text(discord_id),
            referral_source: normalise_optional_text(referral_source),
        }
    }

    /// Canonical email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Discord account identifier, when supplied.
    pub fn discord_id(&self) -> Option<&str> {
        self.discord_id.as_deref()
    }

    /// Referral note, when supplied.
    pub fn referral_source(&self) -> Option<&str> {
        self.referral_source.as_deref()
    }

    /// Promote the draft into a stored record.
    pub fn into_registration(
        self,
        id: RegistrationId,
        created_at: DateTime<Utc>,
    ) -> Registration {
        Registration {
            id,
            email: self.email,
            discord_id: self.discord_id,
            referral_source: self.referral_source,
            created_at,
        }
    }
}

/// Store-assigned identifier of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RegistrationId(Uuid);

impl RegistrationId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A stored registration. Never updated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    id: RegistrationId,
    email: EmailAddress,
    discord_id: Option<String>,
    referral_source: Option<String>,
    created_at: DateTime<Utc>,
}

impl Registration {
    /// Store-assigned identifier.
    pub fn id(&self) -> RegistrationId {
        self.id
    }

    /// Canonical email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Discord account identifier, when supplied.
    pub fn discord_id(&self) -> Option<&str> {
        self.discord_id.as_deref()
    }

    /// Referral note, when supplied.
    pub fn referral_source(&self) -> Option<&str> {
        self.referral_source.as_deref()
    }

    /// Insert timestamp assigned by the store.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl fmt::Display for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.email.fmt(f)
    }
}

fn validate_email(value: Option<&Value>, errors: &mut FieldErrors) -> Option<EmailAddress> {
    let message = match value {
        None => messages::REQUIRED,
        Some(Value::Null) => messages::NULL,
        Some(Value::String(raw)) => match EmailAddress::parse(raw) {
            Ok(email) => return Some(email),
            Err(EmailValidationError::Blank) => messages::BLANK,
            Err(EmailValidationError::TooLong { .. }) => messages::TOO_LONG,
            Err(_) => messages::INVALID_EMAIL,
        },
        Some(_) => messages::INVALID_EMAIL,
    };
    errors.add(EMAIL_FIELD, message);
    None
}

fn validate_optional_text(
    field: &str,
    value: Option<&Value>,
    errors: &mut FieldErrors,
) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => {
            errors.add(field, messages::NOT_A_STRING);
            None
        }
    }
}

/// Outcome of the store-free field rules.
///
/// The parsed email is kept even when another field failed, so the
/// uniqueness rule can add its message next to the other failures.
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadCheck {
    email: Option<EmailAddress>,
    discord_id: Option<String>,
    referral_source: Option<String>,
    errors: FieldErrors,
}

impl PayloadCheck {
    /// Apply every store-free rule to `payload`, collecting all failures.
    pub fn run(payload: &RegistrationPayload) -> Self {
        let mut errors = FieldErrors::new();
        let email = validate_email(payload.get(EMAIL_FIELD), &mut errors);
        let discord_id =
            validate_optional_text(DISCORD_ID_FIELD, payload.get(DISCORD_ID_FIELD), &mut errors);
        let referral_source = validate_optional_text(
            REFERRAL_SOURCE_FIELD,
            payload.get(REFERRAL_SOURCE_FIELD),
            &mut errors,
        );
        Self {
            email,
            discord_id,
            referral_source,
            errors,
        }
    }

    /// The canonical email, when it passed the syntax rules.
    pub fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }

    /// Record a further failure for `field`.
    pub fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    /// The draft when no rule failed, otherwise every recorded failure.
    pub fn into_draft(self) -> Result<RegistrationDraft, FieldErrors> {
        match self.email {
            Some(email) if self.errors.is_empty() => Ok(RegistrationDraft::new(
                email,
                self.discord_id,
                self.referral_source,
            )),
            _ => Err(self.errors),
        }
    }
}

/// Check a payload's field rules without touching any store.
///
/// Every failing field is reported, not only the first. The uniqueness rule
/// needs a store read and is applied by
/// [`RegistrationService`](crate::domain::RegistrationService).
///
/// # Examples
/// ```
/// use serde_json::json;
/// use waitlist::domain::{validate_payload, RegistrationPayload};
///
/// let payload = RegistrationPayload::try_from(json!({
///     "email": "ada@example.com",
///     "referral_source": "  a friend  ",
/// }))
/// .expect("object payload");
/// let draft = validate_payload(&payload).expect("valid payload");
/// assert_eq!(draft.referral_source(), Some("a friend"));
/// assert_eq!(draft.discord_id(), None);
/// ```
pub fn validate_payload(payload: &RegistrationPayload) -> Result<RegistrationDraft, FieldErrors> {
    PayloadCheck::run(payload).into_draft()
}
