//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module. Connections come from a `bb8` pool driven by
//! `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use waitlist::outbound::persistence::{DbPool, DieselRegistrationRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/waitlist")).await?;
//! let repo = DieselRegistrationRepository::new(pool);
//! ```

mod diesel_registration_repository;
mod models;
mod pool;
mod schema;

pub use diesel_registration_repository::DieselRegistrationRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
