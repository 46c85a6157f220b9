//! PostgreSQL-backed `RegistrationRepository` implementation using Diesel ORM.
//!
//! The `registrations_email_key` unique constraint is what actually keeps
//! emails unique; a violation on insert is reported as
//! [`RegistrationPersistenceError::DuplicateEmail`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{ListWindow, RegistrationPersistenceError, RegistrationRepository};
use crate::domain::{EmailAddress, Registration, RegistrationDraft, RegistrationId};

use super::models::{NewRegistrationRow, RegistrationRow};
use super::pool::{DbPool, PoolError};
use super::schema::registrations;

/// Diesel-backed implementation of the `RegistrationRepository` port.
#[derive(Clone)]
pub struct DieselRegistrationRepository {
    pool: DbPool,
}

impl DieselRegistrationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RegistrationPersistenceError {
    RegistrationPersistenceError::connection(error.into_message())
}

/// Map Diesel errors to domain persistence errors.
///
/// `email` is the address involved in an insert, used to describe unique
/// violations.
fn map_diesel_error(
    error: diesel::result::Error,
    email: Option<&EmailAddress>,
) -> RegistrationPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            RegistrationPersistenceError::duplicate_email(
                email.map_or("<unknown>", EmailAddress::as_str),
            )
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RegistrationPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => RegistrationPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => {
            RegistrationPersistenceError::query("database query error")
        }
        _ => RegistrationPersistenceError::query("database error"),
    }
}

fn row_to_registration(row: RegistrationRow) -> Registration {
    RegistrationDraft::new(
        EmailAddress::from_canonical(row.email),
        row.discord_id,
        row.referral_source,
    )
    .into_registration(RegistrationId::from_uuid(row.id), row.created_at)
}

#[async_trait]
impl RegistrationRepository for DieselRegistrationRepository {
    async fn insert(
        &self,
        draft: &RegistrationDraft,
    ) -> Result<Registration, RegistrationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewRegistrationRow {
            id: *RegistrationId::random().as_uuid(),
            email: draft.email().as_str(),
            discord_id: draft.discord_id(),
            referral_source: draft.referral_source(),
        };

        let row: RegistrationRow = diesel::insert_into(registrations::table)
            .values(&new_row)
            .returning(RegistrationRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(draft.email())))?;

        Ok(row_to_registration(row))
    }

    async fn exists_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<bool, RegistrationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(
            registrations::table.filter(registrations::email.eq(email.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(|err| map_diesel_error(err, None))
    }

    async fn count(&self) -> Result<u64, RegistrationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = registrations::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;

        u64::try_from(total).map_err(|_| {
            RegistrationPersistenceError::query(format!("negative row count returned: {total}"))
        })
    }

    async fn list(
        &self,
        window: ListWindow,
    ) -> Result<Vec<Registration>, RegistrationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<RegistrationRow> = registrations::table
            .order((registrations::created_at.desc(), registrations::id.desc()))
            .limit(i64::from(window.limit))
            .offset(i64::from(window.offset))
            .select(RegistrationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;

        Ok(rows.into_iter().map(row_to_registration).collect())
    }
}
