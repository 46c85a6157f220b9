//! Builders for the HTTP handler state.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use waitlist::domain::ports::RegistrationRepository;
use waitlist::inbound::http::state::HttpState;
use waitlist::outbound::memory::InMemoryRegistrationRepository;
use waitlist::outbound::persistence::DieselRegistrationRepository;

use super::ServerConfig;

/// Pick the registration store: PostgreSQL when a pool is configured,
/// otherwise a process-local store.
fn build_repository(config: &ServerConfig) -> Arc<dyn RegistrationRepository> {
    match &config.db_pool {
        Some(pool) => {
            info!("registrations stored in PostgreSQL");
            Arc::new(DieselRegistrationRepository::new(pool.clone()))
        }
        None => {
            warn!("no database configured; registrations are kept in memory and lost on restart");
            Arc::new(InMemoryRegistrationRepository::default())
        }
    }
}

pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    web::Data::new(HttpState::from_repository(build_repository(config)))
}
