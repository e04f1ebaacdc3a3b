//! Core migration logic for Fintrack.
//!
//! This crate contains pure logic with ZERO database or network dependencies.
//! Everything that can be decided without a connection lives here.
//!
//! # Modules
//!
//! - `sql` - SQL-aware statement splitting and log previews
//! - `plan` - Ordered migration file plans
//! - `report` - Per-statement outcomes and run reports
//! - `schema` - Expected tables and verification reports
//! - `categories` - Default category tree installed for new users

pub mod categories;
pub mod plan;
pub mod report;
pub mod schema;
pub mod sql;

pub use plan::{MigrationFile, MigrationPlan};
pub use report::{ExecutionMode, FileReport, FileStatus, RunReport, StatementError, StatementOutcome};
pub use schema::VerificationReport;
pub use sql::{SplitError, Statement, split_statements};
