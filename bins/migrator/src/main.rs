//! Database setup tool for Fintrack.
//!
//! Usage:
//!   migrator [sync]  - Verify, migrate if tables are missing, refresh the seed
//!   migrator up      - Run every migration file in order
//!   migrator verify  - Check the schema without changing anything
//!   migrator print   - Print the files for the dashboard SQL editor
//!
//! Exit status: 0 on success (statement failures are logged and tolerated),
//! 1 on configuration or connection errors, 2 with `--strict` when a
//! statement failed for a reason other than "already exists".

mod cli;
mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use fintrack_core::MigrationPlan;
use fintrack_shared::config::MigrationsConfig;
use fintrack_shared::{AppConfig, AppError};
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, SubCommand, SyncArgs};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fintrack=info,migrator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::init();
    match run(cli).await {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            let app_error = e.downcast_ref::<AppError>();
            error!(code = app_error.map_or("INTERNAL_ERROR", AppError::error_code), "{e:#}");
            ExitCode::from(app_error.map_or(1, AppError::exit_code))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<u8> {
    let command = cli
        .sub_command
        .unwrap_or_else(|| SubCommand::Sync(SyncArgs::default()));
    let root = cli.root;

    let status = match command {
        SubCommand::Sync(args) => commands::sync_command(&load_config(root)?, &args).await?,
        SubCommand::Up(args) => commands::up_command(&load_config(root)?, &args).await?,
        SubCommand::Verify(args) => commands::verify_command(&load_config(root)?, &args).await?,
        SubCommand::Print => commands::print_command(&print_plan(root)).await?,
    };
    Ok(status)
}

fn load_config(root: Option<PathBuf>) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::load()
        .map_err(AppError::from)
        .context("Failed to load configuration")?;
    if let Some(root) = root {
        config.migrations.root = root;
    }
    Ok(config)
}

/// Printing needs no credentials, so a missing database URL falls back to
/// the default file layout.
fn print_plan(root: Option<PathBuf>) -> MigrationPlan {
    let mut migrations = match AppConfig::load() {
        Ok(config) => config.migrations,
        Err(e) => {
            debug!(error = %e, "Using default migration layout");
            MigrationsConfig::default()
        }
    };
    if let Some(root) = root {
        migrations.root = root;
    }
    MigrationPlan::from_config(&migrations)
}
