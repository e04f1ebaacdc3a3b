//! In-memory stand-in for a database, used by unit tests.

use std::sync::Mutex;

use fintrack_core::StatementError;
use sea_orm::DbErr;

use crate::{catalog::Catalog, executor::SqlExecutor};

/// Records executed SQL and answers catalog lookups from fixed data.
#[derive(Default)]
pub struct FakeDb {
    executed: Mutex<Vec<String>>,
    failures: Vec<(String, StatementError)>,
    tables: Mutex<Vec<String>>,
    /// Tables created once any statement containing the key runs.
    creates: Vec<(String, Vec<String>)>,
    auth_schema: bool,
    users: Option<i64>,
    rows: i64,
    rls: Option<bool>,
    broken_checks: Vec<&'static str>,
}

impl FakeDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every statement containing `needle` with `error`.
    pub fn fail_on(mut self, needle: &str, error: StatementError) -> Self {
        self.failures.push((needle.to_string(), error));
        self
    }

    pub fn with_tables(self, tables: &[&str]) -> Self {
        *self.tables.lock().unwrap() = tables.iter().map(ToString::to_string).collect();
        self
    }

    /// Adds `tables` once a statement containing `needle` succeeds.
    pub fn creating(mut self, needle: &str, tables: &[&str]) -> Self {
        self.creates.push((
            needle.to_string(),
            tables.iter().map(ToString::to_string).collect(),
        ));
        self
    }

    pub fn with_auth(mut self, users: Option<i64>) -> Self {
        self.auth_schema = true;
        self.users = users;
        self
    }

    pub fn with_sample(mut self, rows: i64, rls: Option<bool>) -> Self {
        self.rows = rows;
        self.rls = rls;
        self
    }

    /// Makes the named catalog lookup error.
    pub fn breaking(mut self, check: &'static str) -> Self {
        self.broken_checks.push(check);
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    fn check(&self, name: &str) -> Result<(), DbErr> {
        if self.broken_checks.contains(&name) {
            Err(DbErr::Custom(format!("{name} unavailable")))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl SqlExecutor for FakeDb {
    async fn execute_sql(&self, sql: &str) -> Result<(), StatementError> {
        self.executed.lock().unwrap().push(sql.to_string());

        if let Some((_, error)) = self.failures.iter().find(|(needle, _)| sql.contains(needle)) {
            return Err(error.clone());
        }

        let mut tables = self.tables.lock().unwrap();
        for (needle, created) in &self.creates {
            if sql.contains(needle) {
                for table in created {
                    if !tables.contains(table) {
                        tables.push(table.clone());
                    }
                }
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Catalog for FakeDb {
    async fn list_tables(&self, _schema: &str) -> Result<Vec<String>, DbErr> {
        self.check("list_tables")?;
        Ok(self.tables.lock().unwrap().clone())
    }

    async fn schema_exists(&self, _schema: &str) -> Result<bool, DbErr> {
        self.check("schema_exists")?;
        Ok(self.auth_schema)
    }

    async fn table_exists(&self, _schema: &str, _table: &str) -> Result<bool, DbErr> {
        self.check("table_exists")?;
        Ok(self.users.is_some())
    }

    async fn count_rows(&self, schema: &str, _table: &str) -> Result<i64, DbErr> {
        self.check("count_rows")?;
        if self.auth_schema && schema == "auth" {
            return self.users.ok_or_else(|| DbErr::Custom("no users table".into()));
        }
        Ok(self.rows)
    }

    async fn rls_enabled(&self, _schema: &str, _table: &str) -> Result<Option<bool>, DbErr> {
        self.check("rls_enabled")?;
        Ok(self.rls)
    }
}
