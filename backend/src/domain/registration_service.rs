//! Registration domain service.
//!
//! Implements the driving ports over any [`RegistrationRepository`]. The
//! uniqueness pre-check and the store's constraint race against each other;
//! both outcomes surface as the same duplicate-email field error.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::ports::{
    ListWindow, RegistrationCommand, RegistrationError, RegistrationPersistenceError,
    RegistrationQuery, RegistrationRepository,
};
use crate::domain::{
    EMAIL_FIELD, Error, FieldErrors, PayloadCheck, Registration, RegistrationDraft,
    RegistrationPayload, messages,
};

/// Registration service implementing [`RegistrationCommand`] and
/// [`RegistrationQuery`].
pub struct RegistrationService<R: ?Sized> {
    repository: Arc<R>,
}

impl<R: ?Sized> Clone for RegistrationService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ?Sized> RegistrationService<R> {
    /// Create a service backed by `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

fn map_persistence_error(error: RegistrationPersistenceError) -> Error {
    let mapped = match error {
        RegistrationPersistenceError::Connection { message } => Error::service_unavailable(
            format!("registration store unavailable: {message}"),
        ),
        RegistrationPersistenceError::Query { message } => {
            Error::internal(format!("registration store error: {message}"))
        }
        RegistrationPersistenceError::DuplicateEmail { email } => {
            Error::internal(format!("unexpected duplicate outside insert: {email}"))
        }
    };
    error!(code = ?mapped.code(), error = %mapped, "registration store failure");
    mapped
}

impl<R> RegistrationService<R>
where
    R: RegistrationRepository + ?Sized,
{
    /// Apply every field rule, including uniqueness, without writing.
    ///
    /// The uniqueness read runs whenever the email is well formed, so a taken
    /// address is reported alongside failures on other fields.
    pub async fn validate(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<RegistrationDraft, RegistrationError> {
        let mut check = PayloadCheck::run(payload);
        if let Some(email) = check.email() {
            let taken = self
                .repository
                .exists_by_email(email)
                .await
                .map_err(map_persistence_error)?;
            if taken {
                check.reject(EMAIL_FIELD, messages::DUPLICATE_EMAIL);
            }
        }
        check.into_draft().map_err(RegistrationError::from)
    }
}

#[async_trait]
impl<R> RegistrationCommand for RegistrationService<R>
where
    R: RegistrationRepository + ?Sized,
{
    async fn register(
        &self,
        payload: RegistrationPayload,
    ) -> Result<Registration, RegistrationError> {
        let draft = self.validate(&payload).await?;
        match self.repository.insert(&draft).await {
            Ok(registration) => {
                info!(registration_id = %registration.id(), "registration stored");
                Ok(registration)
            }
            Err(RegistrationPersistenceError::DuplicateEmail { .. }) => {
                info!("registration lost the unique email race after validation");
                Err(FieldErrors::duplicate_email().into())
            }
            Err(other) => Err(map_persistence_error(other).into()),
        }
    }
}

#[async_trait]
impl<R> RegistrationQuery for RegistrationService<R>
where
    R: RegistrationRepository + ?Sized,
{
    async fn count(&self) -> Result<u64, Error> {
        self.repository.count().await.map_err(map_persistence_error)
    }

    async fn list(&self, window: ListWindow) -> Result<Vec<Registration>, Error> {
        self.repository
            .list(window)
            .await
            .map_err(map_persistence_error)
    }
}

#[cfg(test)]
#[path = "registration_service_tests.rs"]
mod tests;
