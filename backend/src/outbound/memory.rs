//! Process-local registration store.
//!
//! Used when no database is configured and by the HTTP integration tests.
//! Records live only as long as the process.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{ListWindow, RegistrationPersistenceError, RegistrationRepository};
use crate::domain::{EmailAddress, Registration, RegistrationDraft, RegistrationId};

/// In-memory implementation of the `RegistrationRepository` port.
///
/// Records are kept in insertion order. `created_at` comes from the injected
/// clock but never goes backwards, so newest-first ordering stays stable.
#[derive(Clone)]
pub struct InMemoryRegistrationRepository {
    records: Arc<Mutex<Vec<Registration>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRegistrationRepository {
    /// Empty store stamping records with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Registration>>, RegistrationPersistenceError> {
        self.records
            .lock()
            .map_err(|_| RegistrationPersistenceError::query("registration store lock poisoned"))
    }
}

impl Default for InMemoryRegistrationRepository {
    fn default() -> Self {
        Self::new(Arc::new(mockable::DefaultClock))
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryRegistrationRepository {
    async fn insert(
        &self,
        draft: &RegistrationDraft,
    ) -> Result<Registration, RegistrationPersistenceError> {
        let mut records = self.lock()?;
        if records.iter().any(|record| record.email() == draft.email()) {
            return Err(RegistrationPersistenceError::duplicate_email(
                draft.email().as_str(),
            ));
        }

        let now = self.clock.utc();
        let created_at = records
            .last()
            .map_or(now, |latest| latest.created_at().max(now));
        let registration = draft
            .clone()
            .into_registration(RegistrationId::random(), created_at);
        records.push(registration.clone());
        Ok(registration)
    }

    async fn exists_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<bool, RegistrationPersistenceError> {
        Ok(self.lock()?.iter().any(|record| record.email() == email))
    }

    async fn count(&self) -> Result<u64, RegistrationPersistenceError> {
        Ok(self.lock()?.len() as u64)
    }

    async fn list(
        &self,
        window: ListWindow,
    ) -> Result<Vec<Registration>, RegistrationPersistenceError> {
        let records = self.lock()?;
        Ok(records
            .iter()
            .rev()
            .skip(window.offset as usize)
            .take(window.limit as usize)
            .cloned()
            .collect())
    }
}
