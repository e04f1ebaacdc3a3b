//! Application configuration management.
//!
//! Credentials are never compiled in. They come from `config/*.toml`, the
//! `FINTRACK__*` environment variables, or a plain `DATABASE_URL`.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Hosted project (PostgREST) configuration.
    #[serde(default)]
    pub supabase: Option<SupabaseConfig>,
    /// Migration file layout.
    #[serde(default)]
    pub migrations: MigrationsConfig,
    /// Schema verification settings.
    #[serde(default)]
    pub verify: VerifyConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Seconds to wait for the initial connection.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Schema holding the application tables.
    #[serde(default = "default_schema")]
    pub schema: String,
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_schema() -> String {
    "public".to_string()
}

impl DatabaseConfig {
    /// Returns the connection URL with the password masked, for logging.
    #[must_use]
    pub fn redacted_url(&self) -> String {
        redact_url(&self.url)
    }
}

/// Hosted project configuration used by the RPC executor.
#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. `https://<ref>.supabase.co`.
    pub url: String,
    /// Service role key sent as `apikey` and bearer token.
    pub service_key: String,
}

/// One migration file entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MigrationFileConfig {
    /// Path relative to [`MigrationsConfig::root`].
    pub path: PathBuf,
    /// Human-readable description used in logs.
    pub description: String,
}

/// Migration file layout.
#[derive(Debug, Clone, Deserialize)]
pub struct MigrationsConfig {
    /// Directory the file paths are resolved against.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Files in execution order.
    #[serde(default = "default_files")]
    pub files: Vec<MigrationFileConfig>,
    /// Index into `files` of the seed file applied by `sync`.
    #[serde(default = "default_seed_index")]
    pub seed_index: usize,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_files() -> Vec<MigrationFileConfig> {
    [
        (
            "supabase/migrations/001_initial_schema.sql",
            "Initial schema - Tables and indexes",
        ),
        (
            "supabase/migrations/002_rls_policies.sql",
            "Row Level Security policies",
        ),
        (
            "supabase/seed.sql",
            "Seed data and default categories function",
        ),
    ]
    .into_iter()
    .map(|(path, description)| MigrationFileConfig {
        path: PathBuf::from(path),
        description: description.to_string(),
    })
    .collect()
}

fn default_seed_index() -> usize {
    2
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            files: default_files(),
            seed_index: default_seed_index(),
        }
    }
}

/// Schema verification settings.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyConfig {
    /// Tables that must exist after migration.
    #[serde(default = "default_expected_tables")]
    pub expected_tables: Vec<String>,
    /// Table used for the row count and RLS health checks.
    #[serde(default = "default_sample_table")]
    pub sample_table: String,
    /// Schema holding the hosted auth tables.
    #[serde(default = "default_auth_schema")]
    pub auth_schema: String,
}

/// Tables the application schema must provide.
pub const EXPECTED_TABLES: [&str; 11] = [
    "categories",
    "accounts",
    "transactions",
    "budgets",
    "budget_entries",
    "subscriptions",
    "debts",
    "investment_accounts",
    "holdings",
    "goals",
    "feature_flags",
];

fn default_expected_tables() -> Vec<String> {
    EXPECTED_TABLES.into_iter().map(String::from).collect()
}

fn default_sample_table() -> String {
    "categories".to_string()
}

fn default_auth_schema() -> String {
    "auth".to_string()
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            expected_tables: default_expected_tables(),
            sample_table: default_sample_table(),
            auth_schema: default_auth_schema(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// A bare `DATABASE_URL` is used as the lowest-priority source for
    /// `database.url`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let mut builder = config::Config::builder();
        if let Ok(url) = std::env::var("DATABASE_URL") {
            builder = builder.set_default("database.url", url)?;
        }

        let config = builder
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FINTRACK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

/// Masks the password component of a connection URL.
///
/// URLs without credentials are returned unchanged.
#[must_use]
pub fn redact_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let rest = &url[scheme_end + 3..];
    let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
    let authority = &rest[..authority_end];

    let Some(at) = authority.rfind('@') else {
        return url.to_string();
    };
    let userinfo = &authority[..at];
    let Some(colon) = userinfo.find(':') else {
        return url.to_string();
    };

    format!(
        "{}{}:***{}",
        &url[..scheme_end + 3],
        &userinfo[..colon],
        &rest[at..]
    )
}
