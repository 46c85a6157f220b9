//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` so they depend only on
//! the driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::RegistrationService;
use crate::domain::ports::{RegistrationCommand, RegistrationQuery, RegistrationRepository};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registrations: Arc<dyn RegistrationCommand>,
    pub registrations_query: Arc<dyn RegistrationQuery>,
}

impl HttpState {
    /// Bundle explicit port implementations.
    pub fn new(
        registrations: Arc<dyn RegistrationCommand>,
        registrations_query: Arc<dyn RegistrationQuery>,
    ) -> Self {
        Self {
            registrations,
            registrations_query,
        }
    }

    /// Serve both ports from one [`RegistrationService`] over `repository`.
    pub fn from_repository<R>(repository: Arc<R>) -> Self
    where
        R: RegistrationRepository + ?Sized + 'static,
    {
        let service = Arc::new(RegistrationService::new(repository));
        Self::new(service.clone(), service)
    }
}
