//! Expected schema and verification reports.

use std::collections::BTreeSet;

use serde::Serialize;

pub use fintrack_shared::config::EXPECTED_TABLES;

/// Returns the expected tables absent from `found`, in expected order.
#[must_use]
pub fn missing_tables(expected: &[String], found: &[String]) -> Vec<String> {
    let found: BTreeSet<&str> = found.iter().map(String::as_str).collect();
    let mut seen = BTreeSet::new();

    expected
        .iter()
        .filter(|t| !found.contains(t.as_str()) && seen.insert(t.as_str()))
        .cloned()
        .collect()
}

/// State of the hosted auth schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthStatus {
    /// Whether the auth schema exists.
    pub schema_exists: bool,
    /// Whether `<auth>.users` exists.
    pub users_table_exists: bool,
    /// Number of registered users, when the table exists.
    pub user_count: Option<i64>,
}

/// Health of the sample table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleTableStatus {
    /// Table name.
    pub table: String,
    /// Row count, when the table could be read.
    pub row_count: Option<i64>,
    /// Whether row-level security is enabled, when the table was found.
    pub rls_enabled: Option<bool>,
}

/// A check that could not be completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckFailure {
    /// Name of the check.
    pub check: String,
    /// Error message.
    pub message: String,
}

/// Result of a schema verification pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// Schema that was inspected.
    pub schema: String,
    /// Tables that should exist.
    pub expected: Vec<String>,
    /// Tables found in the schema, sorted.
    pub found: Vec<String>,
    /// Expected tables that were not found.
    pub missing: Vec<String>,
    /// Auth schema state, unless the check failed.
    pub auth: Option<AuthStatus>,
    /// Sample table health, unless the check failed.
    pub sample: Option<SampleTableStatus>,
    /// Checks that errored.
    pub failures: Vec<CheckFailure>,
}

impl VerificationReport {
    /// Creates an empty report for `schema`.
    pub fn new(schema: impl Into<String>, expected: Vec<String>) -> Self {
        Self {
            schema: schema.into(),
            missing: Vec::new(),
            expected,
            found: Vec::new(),
            auth: None,
            sample: None,
            failures: Vec::new(),
        }
    }

    /// Records the tables found and recomputes `missing`.
    pub fn set_found(&mut self, mut found: Vec<String>) {
        found.sort();
        self.missing = missing_tables(&self.expected, &found);
        self.found = found;
    }

    /// Records a check that errored.
    pub fn record_failure(&mut self, check: impl Into<String>, message: impl Into<String>) {
        self.failures.push(CheckFailure {
            check: check.into(),
            message: message.into(),
        });
    }

    /// Returns `true` if the table listing succeeded and nothing is missing.
    #[must_use]
    pub fn all_tables_present(&self) -> bool {
        self.missing.is_empty() && !self.failures.iter().any(|f| f.check == TABLES_CHECK)
    }

    /// Returns `true` if every table is present, every check ran, and the
    /// sample table has row-level security enabled.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.all_tables_present()
            && self.failures.is_empty()
            && self
                .sample
                .as_ref()
                .is_some_and(|s| s.rls_enabled == Some(true))
    }
}

/// Check name used when listing tables fails.
pub const TABLES_CHECK: &str = "tables";
/// Check name used when inspecting the auth schema fails.
pub const AUTH_CHECK: &str = "auth";
/// Check name used when inspecting the sample table fails.
pub const SAMPLE_CHECK: &str = "sample_table";
