//! Statement executors.
//!
//! The runner only needs "send this SQL, tell me if it failed", so that is
//! all the trait asks for. The Postgres connection implements it here; the
//! PostgREST RPC executor lives in [`crate::rest`].

use fintrack_core::StatementError;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, RuntimeErr};

/// Something that can execute raw SQL text.
#[async_trait::async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Executes `sql`, which may hold one statement or, in batch mode, many.
    ///
    /// # Errors
    ///
    /// Returns the server's error, with its SQLSTATE when one is available.
    async fn execute_sql(&self, sql: &str) -> Result<(), StatementError>;
}

#[async_trait::async_trait]
impl SqlExecutor for DatabaseConnection {
    async fn execute_sql(&self, sql: &str) -> Result<(), StatementError> {
        // Unprepared statements go over the simple query protocol, which
        // accepts multi-statement text for batch mode.
        self.execute_unprepared(sql)
            .await
            .map(|_| ())
            .map_err(|err| statement_error(&err))
    }
}

/// Converts a driver error into a statement error, keeping the SQLSTATE.
#[must_use]
pub fn statement_error(err: &DbErr) -> StatementError {
    let db_error = match err {
        DbErr::Exec(RuntimeErr::SqlxError(e)) | DbErr::Query(RuntimeErr::SqlxError(e)) => {
            database_error(e)
        }
        _ => None,
    };

    match db_error {
        Some((message, Some(code))) => StatementError::with_sqlstate(message, code),
        Some((message, None)) => StatementError::new(message),
        None => StatementError::new(err.to_string()),
    }
}

/// Message and SQLSTATE of a server-side error.
fn database_error(err: &sqlx::Error) -> Option<(String, Option<String>)> {
    err.as_database_error()
        .map(|db| (db.message().to_string(), db.code().map(std::borrow::Cow::into_owned)))
}
