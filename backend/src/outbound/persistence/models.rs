//! Internal Diesel row structs. Never exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::registrations;

/// Row read from `registrations`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = registrations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RegistrationRow {
    pub id: Uuid,
    pub email: String,
    pub discord_id: Option<String>,
    pub referral_source: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable row; `created_at` is left to the column default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = registrations)]
pub(crate) struct NewRegistrationRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub discord_id: Option<&'a str>,
    pub referral_source: Option<&'a str>,
}
