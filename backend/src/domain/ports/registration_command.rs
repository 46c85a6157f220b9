//! Driving port for creating registrations.
//!
//! Inbound adapters call this port with the raw payload; they never see the
//! repository or the validator directly.

use async_trait::async_trait;

use crate::domain::{Error, FieldErrors, Registration, RegistrationPayload};

/// Outcome of a rejected registration attempt.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistrationError {
    /// One or more fields failed validation, including a duplicate email.
    #[error("registration rejected: {0}")]
    Invalid(FieldErrors),
    /// The store failed; not recoverable by the caller.
    #[error(transparent)]
    Unavailable(#[from] Error),
}

impl From<FieldErrors> for RegistrationError {
    fn from(errors: FieldErrors) -> Self {
        Self::Invalid(errors)
    }
}

/// Use-case port: validate a payload and store it.
#[async_trait]
pub trait RegistrationCommand: Send + Sync {
    /// Register the sign-up described by `payload`.
    async fn register(
        &self,
        payload: RegistrationPayload,
    ) -> Result<Registration, RegistrationError>;
}
