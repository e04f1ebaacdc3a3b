//! Subcommand handlers.

use std::io::ErrorKind;
use std::path::Path;

use fintrack_core::categories::{DEFAULT_CATEGORIES, children_of, roots};
use fintrack_core::{ExecutionMode, MigrationFile, MigrationPlan, RunReport};
use fintrack_db::{MigrationRunner, RestExecutor, SchemaVerifier, Session, sync};
use fintrack_shared::{AppConfig, AppError, AppResult};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::{SyncArgs, UpArgs, VerifyArgs};

/// Exit status when `--strict` is set and a statement failed for a new reason.
pub const STRICT_FAILURE: u8 = 2;

fn mode(batch: bool) -> ExecutionMode {
    if batch {
        ExecutionMode::Batch
    } else {
        ExecutionMode::PerStatement
    }
}

/// Exit status for a finished run.
pub fn exit_status(strict: bool, hard_failures: usize) -> u8 {
    if strict && hard_failures > 0 {
        STRICT_FAILURE
    } else {
        0
    }
}

pub async fn sync_command(config: &AppConfig, args: &SyncArgs) -> AppResult<u8> {
    let plan = MigrationPlan::from_config(&config.migrations);
    let session = Session::open(&config.database).await?;

    let report = sync(
        session.connection(),
        &plan,
        &config.database.schema,
        &config.verify,
        mode(args.batch),
    )
    .await;
    session.close().await;

    if let Some(path) = &args.report {
        write_report(path, &report)?;
    }
    Ok(exit_status(args.strict, report.hard_failures()))
}

pub async fn up_command(config: &AppConfig, args: &UpArgs) -> AppResult<u8> {
    let plan = MigrationPlan::from_config(&config.migrations);

    let report = if args.via_rest {
        let supabase = config.supabase.as_ref().ok_or_else(|| {
            AppError::Config(
                "supabase.url and supabase.service_key are required for --via-rest".into(),
            )
        })?;
        let executor = RestExecutor::new(supabase)?;
        executor.check_access().await?;
        info!(url = %executor.rpc_url(), "Executing through PostgREST");

        MigrationRunner::new(&executor)
            .with_mode(mode(args.batch))
            .run_migrations(&plan)
            .await
    } else {
        let session = Session::open(&config.database).await?;
        let report = MigrationRunner::new(session.connection())
            .with_mode(mode(args.batch))
            .run_migrations(&plan)
            .await;
        session.close().await;
        report
    };

    log_run_summary(&report);
    if let Some(path) = &args.report {
        write_report(path, &report)?;
    }
    Ok(exit_status(args.strict, report.hard_failures()))
}

pub async fn verify_command(config: &AppConfig, args: &VerifyArgs) -> AppResult<u8> {
    let session = Session::open(&config.database).await?;
    let verifier = SchemaVerifier::new(
        session.connection(),
        &config.database.schema,
        &config.verify,
    );
    let report = verifier.verify().await;
    session.close().await;

    if report.is_healthy() {
        info!("Schema is healthy");
    } else {
        warn!(
            missing = report.missing.len(),
            failed_checks = report.failures.len(),
            "Schema needs attention"
        );
    }

    if let Some(path) = &args.report {
        write_report(path, &report)?;
    }
    Ok(0)
}

/// Prints every migration file between copy markers, for hosted projects
/// where DDL has to be pasted into the dashboard SQL editor.
pub async fn print_command(plan: &MigrationPlan) -> AppResult<u8> {
    println!("Run the following blocks in order in your project's SQL editor.");
    println!("{}", render_plan(plan).await?);
    println!("{}", category_summary());
    Ok(0)
}

/// Copy blocks for every file in the plan. Missing files are skipped with a
/// warning.
pub async fn render_plan(plan: &MigrationPlan) -> AppResult<String> {
    let total = plan.files().len();
    let mut out = String::new();

    for (position, file) in plan.files().iter().enumerate() {
        match tokio::fs::read_to_string(&file.path).await {
            Ok(sql) => out.push_str(&copy_block(position + 1, total, file, &sql)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %file.path.display(), "Migration file not found, skipping");
            }
            Err(e) => {
                return Err(AppError::Io(format!("{}: {e}", file.path.display())));
            }
        }
    }
    Ok(out)
}

/// One file framed by copy markers.
pub fn copy_block(position: usize, total: usize, file: &MigrationFile, sql: &str) -> String {
    let rule = "=".repeat(60);
    format!(
        "\n{rule}\n[{position}/{total}] {}\n{}\n{rule}\n-- >>> COPY FROM HERE\n{}\n-- <<< COPY UNTIL HERE\n",
        file.description,
        file.path.display(),
        sql.trim_end()
    )
}

/// What the seed trigger installs for each new user.
fn category_summary() -> String {
    let mut out = format!(
        "\nThe seed trigger creates {} default categories for each new user:\n",
        DEFAULT_CATEGORIES.len()
    );
    for root in roots() {
        let children: Vec<&str> = children_of(root.name).map(|c| c.name).collect();
        if children.is_empty() {
            out.push_str(&format!("  {}\n", root.name));
        } else {
            out.push_str(&format!("  {} -> {}\n", root.name, children.join(", ")));
        }
    }
    out
}

fn log_run_summary(report: &RunReport) {
    for path in report.missing_files() {
        warn!(path, "Skipped missing file");
    }
    if report.hard_failures() > 0 {
        warn!(
            hard_failures = report.hard_failures(),
            "Some statements failed; see the log above"
        );
    }
}

fn write_report<T: Serialize>(path: &Path, report: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| AppError::Internal(format!("failed to serialize report: {e}")))?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), "Report written");
    Ok(())
}
