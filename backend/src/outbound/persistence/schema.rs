//! Diesel table definitions.
//!
//! Must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Waitlist registrations. `email` holds the canonical (lower-case)
    /// address and carries a unique constraint.
    registrations (id) {
        /// Primary key: UUID v4 assigned by the adapter.
        id -> Uuid,
        /// Canonical email address.
        #[max_length = 254]
        email -> Varchar,
        /// Optional Discord account identifier.
        discord_id -> Nullable<Text>,
        /// Optional free-text referral note.
        referral_source -> Nullable<Text>,
        /// Insert timestamp from `DEFAULT now()`.
        created_at -> Timestamptz,
    }
}
