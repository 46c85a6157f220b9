//! HTTP server configuration object.

use waitlist::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: (String, u16),
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Configuration binding `host:port` with the in-memory store.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            bind_addr: (host.into(), port),
            db_pool: None,
        }
    }

    /// Store registrations in PostgreSQL through `pool`.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
