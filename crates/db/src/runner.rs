//! Sequential migration runner.
//!
//! Files run in plan order and statements in file order, one round-trip at a
//! time. A failing statement is logged and recorded, and the runner moves on
//! to the next one. Nothing is wrapped in a transaction, so a file can be
//! partially applied; the SQL files are written to be re-run.

use std::io::ErrorKind;
use std::path::Path;

use fintrack_core::sql::{PREVIEW_CHARS, preview};
use fintrack_core::{
    ExecutionMode, FileReport, FileStatus, MigrationFile, MigrationPlan, RunReport,
    StatementOutcome, split_statements,
};
use tracing::{info, warn};

use crate::executor::SqlExecutor;

/// Applies migration files through an executor.
pub struct MigrationRunner<'a, E: SqlExecutor + ?Sized> {
    executor: &'a E,
    mode: ExecutionMode,
}

impl<'a, E: SqlExecutor + ?Sized> MigrationRunner<'a, E> {
    /// Creates a per-statement runner.
    #[must_use]
    pub fn new(executor: &'a E) -> Self {
        Self {
            executor,
            mode: ExecutionMode::PerStatement,
        }
    }

    /// Sets the execution mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Applies every file in the plan, in order.
    pub async fn run_migrations(&self, plan: &MigrationPlan) -> RunReport {
        let mut report = RunReport::start(self.mode);

        for file in plan.files() {
            report.files.push(self.run_file(file).await);
        }
        report.finish();

        info!(
            files = report.files.len(),
            successes = report.successes(),
            failures = report.failures(),
            hard_failures = report.hard_failures(),
            "Migration run finished"
        );
        report
    }

    /// Reads and applies one file.
    ///
    /// A missing file is skipped with a warning. A file that cannot be read
    /// is recorded as a single failure.
    pub async fn run_file(&self, file: &MigrationFile) -> FileReport {
        let shown = file.path.display().to_string();
        info!(path = %shown, "Running {}", file.description);

        match tokio::fs::read_to_string(&file.path).await {
            Ok(sql) => self.run_script(&file.path, &file.description, &sql).await,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %shown, "Migration file not found, skipping");
                FileReport::skipped(shown, file.description.clone(), FileStatus::Missing)
            }
            Err(e) => {
                warn!(path = %shown, error = %e, "Failed to read migration file");
                FileReport::skipped(
                    shown,
                    file.description.clone(),
                    FileStatus::Unreadable(e.to_string()),
                )
            }
        }
    }

    /// Applies SQL text that has already been read.
    pub async fn run_script(&self, path: &Path, description: &str, sql: &str) -> FileReport {
        let shown = path.display().to_string();

        let statements = match split_statements(sql) {
            Ok(statements) => statements,
            Err(e) => {
                warn!(path = %shown, error = %e, "Failed to split migration file");
                return FileReport::skipped(
                    shown,
                    description,
                    FileStatus::Unsplittable(e.to_string()),
                );
            }
        };

        let mut report = FileReport::new(shown, description);
        match self.mode {
            ExecutionMode::PerStatement => {
                for statement in &statements {
                    let preview = statement.preview();
                    let outcome = match self.executor.execute_sql(&statement.sql).await {
                        Ok(()) => {
                            info!("✓ {preview}");
                            StatementOutcome::applied(statement.index, statement.line, preview)
                        }
                        Err(error) => {
                            warn!(line = statement.line, "✗ {preview}: {error}");
                            StatementOutcome::failed(
                                statement.index,
                                statement.line,
                                preview,
                                error,
                            )
                        }
                    };
                    report.statements.push(outcome);
                }
            }
            ExecutionMode::Batch => {
                if let Some(first) = statements.first() {
                    let preview = preview(&first.sql, PREVIEW_CHARS);
                    let outcome = match self.executor.execute_sql(sql).await {
                        Ok(()) => {
                            info!(statements = statements.len(), "✓ {preview}");
                            StatementOutcome::applied(0, first.line, preview)
                        }
                        Err(error) => {
                            warn!(statements = statements.len(), "✗ batch failed: {error}");
                            StatementOutcome::failed(0, first.line, preview, error)
                        }
                    };
                    report.statements.push(outcome);
                }
            }
        }

        info!(
            path = %report.path,
            successes = report.successes(),
            failures = report.failures(),
            already_applied = report.already_applied(),
            "Completed {}",
            report.description
        );
        report
    }
}
