//! HTTP inbound adapter exposing the registration REST endpoints.

pub mod error;
pub mod health;
pub mod registrations;
pub mod schemas;
pub mod state;

pub use error::ApiResult;
