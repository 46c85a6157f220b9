//! Waitlist registration service library.
//!
//! Layout follows ports and adapters: [`domain`] holds the model and
//! use-cases, [`inbound`] exposes them over HTTP, and [`outbound`] stores
//! registrations in PostgreSQL or in memory.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
pub use settings::AppSettings;
