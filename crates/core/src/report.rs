//! Migration outcomes.
//!
//! Every statement produces a [`StatementOutcome`]. Outcomes accumulate into
//! a [`FileReport`] per file and a [`RunReport`] per run, which serialize to
//! JSON for `--report`.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// SQLSTATE codes meaning the object a DDL statement creates already exists.
///
/// A statement failing with one of these was applied by an earlier run.
pub const ALREADY_EXISTS_CODES: [&str; 5] = [
    "42P07", // duplicate_table (also indexes, views, sequences)
    "42710", // duplicate_object (policies, triggers, constraints)
    "42P06", // duplicate_schema
    "42723", // duplicate_function
    "42701", // duplicate_column
];

/// How statements are handed to the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One round-trip per statement; a failure affects only that statement.
    #[default]
    PerStatement,
    /// The whole file as one multi-statement request; one outcome per file.
    Batch,
}

/// A failed statement's error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementError {
    /// Error message from the server or driver.
    pub message: String,
    /// Five-character SQLSTATE, when the server supplied one.
    pub sqlstate: Option<String>,
}

impl StatementError {
    /// Creates an error without a SQLSTATE.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sqlstate: None,
        }
    }

    /// Creates an error carrying a SQLSTATE.
    pub fn with_sqlstate(message: impl Into<String>, sqlstate: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sqlstate: Some(sqlstate.into()),
        }
    }

    /// Returns `true` if the error says the object already exists.
    #[must_use]
    pub fn is_already_applied(&self) -> bool {
        self.sqlstate
            .as_deref()
            .is_some_and(|code| ALREADY_EXISTS_CODES.contains(&code))
    }
}

impl std::fmt::Display for StatementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.sqlstate {
            Some(code) => write!(f, "{} (SQLSTATE {code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Result of executing one statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementOutcome {
    /// 0-based statement index within the file.
    pub index: usize,
    /// 1-based line where the statement starts.
    pub line: usize,
    /// One-line preview of the statement.
    pub preview: String,
    /// The error, or `None` if the statement was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StatementError>,
}

impl StatementOutcome {
    /// Outcome of a statement that succeeded.
    #[must_use]
    pub fn applied(index: usize, line: usize, preview: String) -> Self {
        Self {
            index,
            line,
            preview,
            error: None,
        }
    }

    /// Outcome of a statement that failed.
    #[must_use]
    pub fn failed(index: usize, line: usize, preview: String, error: StatementError) -> Self {
        Self {
            index,
            line,
            preview,
            error: Some(error),
        }
    }

    /// Returns `true` if the statement succeeded.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.error.is_none()
    }
}

/// What happened to a file as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum FileStatus {
    /// Every statement was attempted.
    Completed,
    /// The file does not exist and was skipped.
    Missing,
    /// The file exists but could not be read.
    Unreadable(String),
    /// The file could not be split into statements.
    Unsplittable(String),
}

/// Outcomes for one migration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// File path as displayed in logs.
    pub path: String,
    /// Human-readable description.
    pub description: String,
    /// Overall status.
    #[serde(flatten)]
    pub status: FileStatus,
    /// Per-statement outcomes, in execution order.
    pub statements: Vec<StatementOutcome>,
}

impl FileReport {
    /// Creates an empty report for a file that is about to run.
    pub fn new(path: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            description: description.into(),
            status: FileStatus::Completed,
            statements: Vec::new(),
        }
    }

    /// Creates a report for a file that was not run.
    #[must_use]
    pub fn skipped(path: impl Into<String>, description: impl Into<String>, status: FileStatus) -> Self {
        Self {
            status,
            ..Self::new(path, description)
        }
    }

    /// Number of statements applied.
    #[must_use]
    pub fn successes(&self) -> usize {
        self.statements.iter().filter(|s| s.is_applied()).count()
    }

    /// Number of failures. A file that could not be read or split counts as
    /// one failure; a missing file counts as none.
    #[must_use]
    pub fn failures(&self) -> usize {
        match self.status {
            FileStatus::Unreadable(_) | FileStatus::Unsplittable(_) => 1,
            FileStatus::Completed | FileStatus::Missing => {
                self.statements.iter().filter(|s| !s.is_applied()).count()
            }
        }
    }

    /// Failures caused by objects that already exist.
    #[must_use]
    pub fn already_applied(&self) -> usize {
        self.statements
            .iter()
            .filter_map(|s| s.error.as_ref())
            .filter(|e| e.is_already_applied())
            .count()
    }

    /// Failures that are not explained by a previous run.
    #[must_use]
    pub fn hard_failures(&self) -> usize {
        self.failures() - self.already_applied()
    }
}

/// Outcomes for a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Execution mode used.
    pub mode: ExecutionMode,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: Option<DateTime<Utc>>,
    /// One report per planned file, in order.
    pub files: Vec<FileReport>,
}

impl RunReport {
    /// Starts a report now.
    #[must_use]
    pub fn start(mode: ExecutionMode) -> Self {
        Self {
            mode,
            started_at: Utc::now(),
            finished_at: None,
            files: Vec::new(),
        }
    }

    /// Stamps the finish time.
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Total statements applied across all files.
    #[must_use]
    pub fn successes(&self) -> usize {
        self.files.iter().map(FileReport::successes).sum()
    }

    /// Total failures across all files.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.files.iter().map(FileReport::failures).sum()
    }

    /// Total failures not explained by a previous run.
    #[must_use]
    pub fn hard_failures(&self) -> usize {
        self.files.iter().map(FileReport::hard_failures).sum()
    }

    /// Files that were skipped because they do not exist.
    #[must_use]
    pub fn missing_files(&self) -> Vec<&str> {
        self.files
            .iter()
            .filter(|f| f.status == FileStatus::Missing)
            .map(|f| f.path.as_str())
            .collect()
    }
}
