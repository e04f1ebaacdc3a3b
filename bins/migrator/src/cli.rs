//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub struct Cli {
    /// Directory the migration file paths are resolved against.
    #[clap(long, global = true)]
    pub root: Option<PathBuf>,
    /// Defaults to `sync`.
    #[clap(subcommand)]
    pub sub_command: Option<SubCommand>,
}

impl Cli {
    pub fn init() -> Self {
        Self::parse()
    }
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SubCommand {
    /// Verify, migrate if tables are missing, refresh the seed, verify again.
    Sync(SyncArgs),
    /// Run every migration file in order.
    Up(UpArgs),
    /// Check the schema without changing anything.
    Verify(VerifyArgs),
    /// Print the migration files for pasting into the dashboard SQL editor.
    Print,
}

#[derive(Args, Debug, Default, PartialEq, Eq)]
pub struct SyncArgs {
    /// Send each file as one multi-statement request.
    #[clap(long)]
    pub batch: bool,
    /// Write a JSON report to this path.
    #[clap(long, short = 'r')]
    pub report: Option<PathBuf>,
    /// Exit with status 2 if any statement failed for a new reason.
    #[clap(long)]
    pub strict: bool,
}

#[derive(Args, Debug, Default, PartialEq, Eq)]
pub struct UpArgs {
    /// Send each file as one multi-statement request.
    #[clap(long)]
    pub batch: bool,
    /// Execute through the PostgREST `exec_sql` function instead of a
    /// database connection.
    #[clap(long)]
    pub via_rest: bool,
    /// Write a JSON report to this path.
    #[clap(long, short = 'r')]
    pub report: Option<PathBuf>,
    /// Exit with status 2 if any statement failed for a new reason.
    #[clap(long)]
    pub strict: bool,
}

#[derive(Args, Debug, Default, PartialEq, Eq)]
pub struct VerifyArgs {
    /// Write a JSON report to this path.
    #[clap(long, short = 'r')]
    pub report: Option<PathBuf>,
}
