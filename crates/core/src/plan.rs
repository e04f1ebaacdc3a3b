//! Ordered migration file plans.

use std::path::{Path, PathBuf};

use fintrack_shared::config::MigrationsConfig;
use serde::Serialize;

/// A SQL file to apply, with the description shown in logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationFile {
    /// Resolved path of the file.
    pub path: PathBuf,
    /// Human-readable description.
    pub description: String,
}

impl MigrationFile {
    /// Creates a migration file entry.
    pub fn new(path: impl Into<PathBuf>, description: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            description: description.into(),
        }
    }
}

/// The files a run applies, in order.
///
/// Order matters: later files depend on objects created by earlier ones
/// (policies on tables, triggers on functions).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationPlan {
    files: Vec<MigrationFile>,
    seed_index: Option<usize>,
}

impl MigrationPlan {
    /// Creates a plan from explicit files, with no designated seed file.
    #[must_use]
    pub fn new(files: Vec<MigrationFile>) -> Self {
        Self {
            files,
            seed_index: None,
        }
    }

    /// Builds the plan described by configuration, resolving paths against
    /// the configured root.
    #[must_use]
    pub fn from_config(config: &MigrationsConfig) -> Self {
        let files = config
            .files
            .iter()
            .map(|f| MigrationFile::new(resolve(&config.root, &f.path), f.description.clone()))
            .collect::<Vec<_>>();
        let seed_index = (config.seed_index < files.len()).then_some(config.seed_index);

        Self { files, seed_index }
    }

    /// Marks the file at `index` as the seed file.
    #[must_use]
    pub fn with_seed(mut self, index: usize) -> Self {
        self.seed_index = (index < self.files.len()).then_some(index);
        self
    }

    /// All files, in execution order.
    #[must_use]
    pub fn files(&self) -> &[MigrationFile] {
        &self.files
    }

    /// The seed file, if the plan has one.
    #[must_use]
    pub fn seed(&self) -> Option<&MigrationFile> {
        self.seed_index.and_then(|i| self.files.get(i))
    }

    /// Returns `true` if the plan has no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
