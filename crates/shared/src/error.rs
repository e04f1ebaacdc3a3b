//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Only errors that end a run live here. Per-statement SQL failures are
/// recorded in reports and never surface as an `AppError`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The database could not be reached.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Local file I/O failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// Database error outside of statement execution.
    #[error("Database error: {0}")]
    Database(String),

    /// Hosted REST endpoint error.
    #[error("Remote service error: {0}")]
    Remote(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_)
            | Self::Connection(_)
            | Self::Io(_)
            | Self::Database(_)
            | Self::Remote(_)
            | Self::Internal(_) => 1,
        }
    }

    /// Returns a stable error code for logs and reports.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Connection(_) => "CONNECTION_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Remote(_) => "REMOTE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
