//! Driven port for registration storage and its errors.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Registration, RegistrationDraft};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by registration repository adapters.
    pub enum RegistrationPersistenceError {
        /// Connection could not be obtained or was lost mid-operation.
        Connection { message: String } => "registration repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "registration repository query failed: {message}",
        /// The insert lost a race on the unique email constraint.
        DuplicateEmail { email: String } => "a registration for {email} already exists",
    }
}

/// Page selection for [`RegistrationRepository::list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListWindow {
    /// Maximum number of records to return.
    pub limit: u32,
    /// Number of newest records to skip.
    pub offset: u32,
}

impl Default for ListWindow {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
        }
    }
}

/// Durable store of registration records.
///
/// The store's own uniqueness constraint on the canonical email is the
/// authoritative guard; [`exists_by_email`](Self::exists_by_email) only
/// supports the friendly pre-check.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Persist `draft`, assigning an identifier and `created_at`.
    ///
    /// Returns [`RegistrationPersistenceError::DuplicateEmail`] when another
    /// record already holds the address.
    async fn insert(
        &self,
        draft: &RegistrationDraft,
    ) -> Result<Registration, RegistrationPersistenceError>;

    /// Whether any record holds `email`.
    async fn exists_by_email(&self, email: &EmailAddress)
    -> Result<bool, RegistrationPersistenceError>;

    /// Number of stored records.
    async fn count(&self) -> Result<u64, RegistrationPersistenceError>;

    /// Records ordered newest first.
    async fn list(
        &self,
        window: ListWindow,
    ) -> Result<Vec<Registration>, RegistrationPersistenceError>;
}
