//! Read-only schema verification.

use fintrack_core::VerificationReport;
use fintrack_core::schema::{
    AUTH_CHECK, AuthStatus, SAMPLE_CHECK, SampleTableStatus, TABLES_CHECK,
};
use fintrack_shared::config::VerifyConfig;
use sea_orm::DbErr;
use tracing::{info, warn};

use crate::catalog::Catalog;

/// Checks the application schema against the expected table list.
///
/// Every check runs even if an earlier one errored; errors are recorded in
/// the report.
pub struct SchemaVerifier<'a, C: Catalog + ?Sized> {
    catalog: &'a C,
    schema: String,
    expected: Vec<String>,
    sample_table: String,
    auth_schema: String,
}

impl<'a, C: Catalog + ?Sized> SchemaVerifier<'a, C> {
    /// Creates a verifier for `schema` using the configured expectations.
    #[must_use]
    pub fn new(catalog: &'a C, schema: impl Into<String>, config: &VerifyConfig) -> Self {
        Self {
            catalog,
            schema: schema.into(),
            expected: config.expected_tables.clone(),
            sample_table: config.sample_table.clone(),
            auth_schema: config.auth_schema.clone(),
        }
    }

    /// Runs every check.
    pub async fn verify(&self) -> VerificationReport {
        let mut report = VerificationReport::new(self.schema.clone(), self.expected.clone());

        info!(schema = %self.schema, "Checking existing tables");
        match self.catalog.list_tables(&self.schema).await {
            Ok(found) => {
                report.set_found(found);
                info!(count = report.found.len(), "Found tables: {}", report.found.join(", "));
                if report.missing.is_empty() {
                    info!("All {} expected tables exist", report.expected.len());
                } else {
                    warn!("Missing tables: {}", report.missing.join(", "));
                }
            }
            Err(e) => {
                warn!(error = %e, "Could not list tables");
                report.record_failure(TABLES_CHECK, e.to_string());
            }
        }

        match self.check_auth().await {
            Ok(auth) => report.auth = Some(auth),
            Err(e) => {
                warn!(error = %e, "Could not inspect the auth schema");
                report.record_failure(AUTH_CHECK, e.to_string());
            }
        }

        match self.check_sample().await {
            Ok(sample) => report.sample = Some(sample),
            Err(e) => {
                warn!(table = %self.sample_table, error = %e, "Could not inspect sample table");
                report.record_failure(SAMPLE_CHECK, e.to_string());
            }
        }

        report
    }

    async fn check_auth(&self) -> Result<AuthStatus, DbErr> {
        let mut status = AuthStatus {
            schema_exists: self.catalog.schema_exists(&self.auth_schema).await?,
            ..AuthStatus::default()
        };
        if !status.schema_exists {
            warn!(schema = %self.auth_schema, "Auth schema not found");
            return Ok(status);
        }

        status.users_table_exists = self
            .catalog
            .table_exists(&self.auth_schema, "users")
            .await?;
        if status.users_table_exists {
            let count = self.catalog.count_rows(&self.auth_schema, "users").await?;
            info!(users = count, "Auth schema ready");
            status.user_count = Some(count);
        } else {
            warn!(schema = %self.auth_schema, "Auth schema has no users table");
        }

        Ok(status)
    }

    async fn check_sample(&self) -> Result<SampleTableStatus, DbErr> {
        let rls_enabled = self
            .catalog
            .rls_enabled(&self.schema, &self.sample_table)
            .await?;

        let row_count = match rls_enabled {
            Some(_) => Some(
                self.catalog
                    .count_rows(&self.schema, &self.sample_table)
                    .await?,
            ),
            None => None,
        };

        match (row_count, rls_enabled) {
            (Some(rows), Some(true)) => {
                info!(table = %self.sample_table, rows, "Row level security enabled");
            }
            (Some(rows), Some(false)) => {
                warn!(table = %self.sample_table, rows, "Row level security is NOT enabled");
            }
            _ => warn!(table = %self.sample_table, "Sample table not found"),
        }

        Ok(SampleTableStatus {
            table: self.sample_table.clone(),
            row_count,
            rls_enabled,
        })
    }
}
