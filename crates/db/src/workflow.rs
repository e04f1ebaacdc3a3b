//! The end-to-end `sync` workflow.

use fintrack_core::{ExecutionMode, FileReport, MigrationPlan, RunReport, VerificationReport};
use fintrack_shared::config::VerifyConfig;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    catalog::Catalog, executor::SqlExecutor, runner::MigrationRunner, verifier::SchemaVerifier,
};

/// Everything a `sync` run did.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    /// Schema state before anything ran.
    pub initial: VerificationReport,
    /// Full migration run, when tables were missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrations: Option<RunReport>,
    /// Seed file run, when the schema was already complete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<FileReport>,
    /// Schema state after the run.
    #[serde(rename = "final")]
    pub final_report: VerificationReport,
}

impl SyncReport {
    /// Failures not explained by a previous run, across migrations and seed.
    #[must_use]
    pub fn hard_failures(&self) -> usize {
        self.migrations.as_ref().map_or(0, RunReport::hard_failures)
            + self.seed.as_ref().map_or(0, FileReport::hard_failures)
    }
}

/// Brings the schema up to date and reports its final state.
///
/// If any expected table is missing, every planned file runs (the seed file
/// included). Otherwise only the seed file runs, which refreshes the
/// default-category function and trigger. A final verification follows
/// either way.
pub async fn sync<D>(
    db: &D,
    plan: &MigrationPlan,
    schema: &str,
    verify: &VerifyConfig,
    mode: ExecutionMode,
) -> SyncReport
where
    D: SqlExecutor + Catalog + ?Sized,
{
    let verifier = SchemaVerifier::new(db, schema, verify);
    let runner = MigrationRunner::new(db).with_mode(mode);

    let initial = verifier.verify().await;

    let mut migrations = None;
    let mut seed = None;
    if initial.all_tables_present() {
        info!("All tables exist, skipping schema migrations");
        match plan.seed() {
            Some(file) => seed = Some(runner.run_file(file).await),
            None => warn!("No seed file configured"),
        }
    } else {
        info!("Running migrations");
        migrations = Some(runner.run_migrations(plan).await);
    }

    info!("Verifying final state");
    let final_report = verifier.verify().await;
    if final_report.is_healthy() {
        info!("Database setup complete");
    } else {
        warn!(
            missing = final_report.missing.len(),
            failed_checks = final_report.failures.len(),
            "Database setup finished with problems"
        );
    }

    SyncReport {
        initial,
        migrations,
        seed,
        final_report,
    }
}
