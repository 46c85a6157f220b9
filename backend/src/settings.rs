//! Service settings loaded via OrthoConfig.
//!
//! Values come from `WAITLIST_*` environment variables, command-line flags or
//! a configuration file. Every field is optional; the accessors apply the
//! defaults.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::ports::ListWindow;
use crate::outbound::persistence::PoolConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

/// Settings shared by the server and the operator binaries.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WAITLIST")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// PostgreSQL connection URL. Without it registrations live in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub db_connection_timeout_secs: Option<u64>,
    /// Page size for `list-registrations`.
    pub list_limit: Option<u32>,
    /// Number of newest records `list-registrations` skips.
    pub list_offset: Option<u32>,
}

impl AppSettings {
    /// Bind host, `0.0.0.0` unless configured.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Bind port, `8000` unless configured.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Pool settings, or `None` when no database is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref()?.trim();
        if url.is_empty() {
            return None;
        }
        let config = PoolConfig::new(url)
            .with_max_size(
                self.db_max_connections
                    .unwrap_or(PoolConfig::DEFAULT_MAX_SIZE),
            )
            .with_connection_timeout(
                self.db_connection_timeout_secs
                    .map_or(PoolConfig::DEFAULT_CONNECTION_TIMEOUT, Duration::from_secs),
            );
        Some(config)
    }

    /// Listing window for operator output.
    pub fn list_window(&self) -> ListWindow {
        let defaults = ListWindow::default();
        ListWindow {
            limit: self.list_limit.unwrap_or(defaults.limit),
            offset: self.list_offset.unwrap_or(defaults.offset),
        }
    }
}
