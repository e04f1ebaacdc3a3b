//! Read-only access to the Postgres system catalogs.

use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, DbErr, Statement, Value};

/// Catalog lookups used by the schema verifier.
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// Lists the tables in `schema`.
    async fn list_tables(&self, schema: &str) -> Result<Vec<String>, DbErr>;

    /// Returns `true` if `schema` exists.
    async fn schema_exists(&self, schema: &str) -> Result<bool, DbErr>;

    /// Returns `true` if `schema.table` exists.
    async fn table_exists(&self, schema: &str, table: &str) -> Result<bool, DbErr>;

    /// Counts the rows of `schema.table`.
    async fn count_rows(&self, schema: &str, table: &str) -> Result<i64, DbErr>;

    /// Returns whether row-level security is enabled on `schema.table`, or
    /// `None` if the table does not exist.
    async fn rls_enabled(&self, schema: &str, table: &str) -> Result<Option<bool>, DbErr>;
}

const LIST_TABLES_SQL: &str =
    "SELECT tablename FROM pg_catalog.pg_tables WHERE schemaname = $1 ORDER BY tablename";

const SCHEMA_EXISTS_SQL: &str = "SELECT EXISTS (\
     SELECT 1 FROM information_schema.schemata WHERE schema_name = $1\
     ) AS present";

const TABLE_EXISTS_SQL: &str = "SELECT EXISTS (\
     SELECT 1 FROM information_schema.tables WHERE table_schema = $1 AND table_name = $2\
     ) AS present";

const RLS_ENABLED_SQL: &str = "SELECT c.relrowsecurity AS enabled \
     FROM pg_catalog.pg_class c \
     JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace \
     WHERE n.nspname = $1 AND c.relname = $2 AND c.relkind IN ('r', 'p')";

fn statement(sql: &str, values: impl IntoIterator<Item = Value>) -> Statement {
    Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
}

/// Quotes an identifier for interpolation into SQL.
#[must_use]
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[async_trait::async_trait]
impl Catalog for DatabaseConnection {
    async fn list_tables(&self, schema: &str) -> Result<Vec<String>, DbErr> {
        let rows = self
            .query_all(statement(LIST_TABLES_SQL, [schema.into()]))
            .await?;

        rows.iter()
            .map(|row| row.try_get::<String>("", "tablename"))
            .collect()
    }

    async fn schema_exists(&self, schema: &str) -> Result<bool, DbErr> {
        let row = self
            .query_one(statement(SCHEMA_EXISTS_SQL, [schema.into()]))
            .await?;

        match row {
            Some(row) => row.try_get("", "present"),
            None => Ok(false),
        }
    }

    async fn table_exists(&self, schema: &str, table: &str) -> Result<bool, DbErr> {
        let row = self
            .query_one(statement(TABLE_EXISTS_SQL, [schema.into(), table.into()]))
            .await?;

        match row {
            Some(row) => row.try_get("", "present"),
            None => Ok(false),
        }
    }

    async fn count_rows(&self, schema: &str, table: &str) -> Result<i64, DbErr> {
        let sql = format!(
            "SELECT COUNT(*) AS count FROM {}.{}",
            quote_ident(schema),
            quote_ident(table)
        );
        let row = self
            .query_one(Statement::from_string(DbBackend::Postgres, sql))
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("{schema}.{table}")))?;

        row.try_get("", "count")
    }

    async fn rls_enabled(&self, schema: &str, table: &str) -> Result<Option<bool>, DbErr> {
        let row = self
            .query_one(statement(RLS_ENABLED_SQL, [schema.into(), table.into()]))
            .await?;

        row.map(|row| row.try_get("", "enabled")).transpose()
    }
}
