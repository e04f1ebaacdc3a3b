//! Connection lifetime for one toolkit run.

use std::time::Duration;

use fintrack_shared::{AppError, config::DatabaseConfig};
use sea_orm::DatabaseConnection;
use tracing::{info, warn};

/// The single database connection a run works through.
///
/// Opened once at start and closed explicitly at the end, on success and on
/// error paths alike.
#[derive(Debug)]
pub struct Session {
    db: DatabaseConnection,
}

impl Session {
    /// Connects to the configured database.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Connection`] if the database cannot be reached.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, AppError> {
        let url = config.redacted_url();
        info!(url = %url, "Connecting to database");

        let db = crate::connect(
            &config.url,
            Duration::from_secs(config.connect_timeout_secs),
        )
        .await
        .map_err(|e| AppError::Connection(format!("{url}: {e}")))?;

        info!("Connected to database");
        Ok(Self { db })
    }

    /// The underlying connection.
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Closes the connection. Errors are logged, not returned.
    pub async fn close(self) {
        match self.db.close().await {
            Ok(()) => info!("Database connection closed"),
            Err(e) => warn!(error = %e, "Failed to close database connection"),
        }
    }
}
