//! Driving port for reading registrations.

use async_trait::async_trait;

use crate::domain::{Error, Registration};

use super::ListWindow;

/// Use-case port for aggregate and administrative reads.
#[async_trait]
pub trait RegistrationQuery: Send + Sync {
    /// Total number of stored registrations.
    async fn count(&self) -> Result<u64, Error>;

    /// Registrations ordered newest first, for operators.
    async fn list(&self, window: ListWindow) -> Result<Vec<Registration>, Error>;
}
