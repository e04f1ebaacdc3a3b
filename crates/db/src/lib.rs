//! Database layer for the Fintrack migration toolkit.
//!
//! This crate provides:
//! - Statement executors (Postgres connection and PostgREST RPC)
//! - The migration runner
//! - The read-only schema verifier
//! - The `sync` workflow tying them together

pub mod catalog;
pub mod executor;
pub mod rest;
pub mod runner;
pub mod session;
pub mod verifier;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use catalog::Catalog;
pub use executor::{SqlExecutor, statement_error};
pub use rest::RestExecutor;
pub use runner::MigrationRunner;
pub use session::Session;
pub use verifier::SchemaVerifier;
pub use workflow::{SyncReport, sync};

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a single-connection handle to the database.
///
/// Migrations run one statement at a time, so the pool is capped at one
/// connection.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str, timeout: Duration) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(1)
        .min_connections(1)
        .connect_timeout(timeout)
        .acquire_timeout(timeout)
        .sqlx_logging(false);

    Database::connect(options).await
}
