//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (implemented by outbound adapters):
//! - [`RegistrationRepository`]
//!
//! Driving ports (called by inbound adapters):
//! - [`RegistrationCommand`]
//! - [`RegistrationQuery`]

mod macros;
pub(crate) use macros::define_port_error;

mod registration_command;
mod registration_query;
mod registration_repository;

pub use registration_command::{RegistrationCommand, RegistrationError};
pub use registration_query::RegistrationQuery;
#[cfg(test)]
pub use registration_repository::MockRegistrationRepository;
pub use registration_repository::{
    ListWindow, RegistrationPersistenceError, RegistrationRepository,
};
