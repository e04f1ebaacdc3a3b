//! PostgREST RPC executor.
//!
//! Hosted projects that expose an `exec_sql(sql_query text)` function can
//! run migrations over HTTPS with the service key instead of a direct
//! database connection.

use fintrack_core::StatementError;
use fintrack_shared::{AppError, config::SupabaseConfig};
use reqwest::{
    Client, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::Deserialize;

use crate::executor::SqlExecutor;

/// Path of the RPC endpoint relative to the project URL.
pub const EXEC_SQL_PATH: &str = "/rest/v1/rpc/exec_sql";

/// Executes SQL through the `exec_sql` RPC function.
#[derive(Debug, Clone)]
pub struct RestExecutor {
    client: Client,
    base_url: String,
    rpc_url: String,
}

impl RestExecutor {
    /// Creates an executor for the configured project.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the service key is not a valid
    /// header value, or an internal error if the HTTP client cannot be built.
    pub fn new(config: &SupabaseConfig) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&config.service_key)
            .map_err(|_| AppError::Config("supabase.service_key is not a valid header".into()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.service_key))
            .map_err(|_| AppError::Config("supabase.service_key is not a valid header".into()))?;
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {e}")))?;

        let base_url = config.url.trim_end_matches('/').to_string();
        let rpc_url = format!("{base_url}{EXEC_SQL_PATH}");

        Ok(Self {
            client,
            base_url,
            rpc_url,
        })
    }

    /// URL statements are posted to.
    #[must_use]
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Checks that the project answers with the configured key.
    ///
    /// # Errors
    ///
    /// Returns a connection error if the request fails, or a remote error if
    /// the key is rejected.
    pub async fn check_access(&self) -> Result<(), AppError> {
        let response = self
            .client
            .get(format!("{}/rest/v1/", self.base_url))
            .send()
            .await
            .map_err(|e| AppError::Connection(format!("{}: {e}", self.base_url)))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AppError::Remote(format!(
                "{} rejected the service key ({})",
                self.base_url,
                response.status()
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl SqlExecutor for RestExecutor {
    async fn execute_sql(&self, sql: &str) -> Result<(), StatementError> {
        let response = self
            .client
            .post(&self.rpc_url)
            .json(&serde_json::json!({ "sql_query": sql }))
            .send()
            .await
            .map_err(|e| StatementError::new(format!("request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(parse_error_body(status, &body))
    }
}

#[derive(Debug, Deserialize)]
struct PostgrestError {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
}

/// Turns a non-2xx PostgREST response into a statement error.
///
/// PostgREST forwards Postgres errors as `{code, message, details, hint}`.
/// Its own errors use `PGRST*` codes, which are not SQLSTATEs.
#[must_use]
pub fn parse_error_body(status: StatusCode, body: &str) -> StatementError {
    let Ok(error) = serde_json::from_str::<PostgrestError>(body) else {
        let body = body.trim();
        return if body.is_empty() {
            StatementError::new(format!("HTTP {status}"))
        } else {
            StatementError::new(format!("HTTP {status}: {body}"))
        };
    };

    let mut message = error.message.unwrap_or_else(|| format!("HTTP {status}"));
    if let Some(details) = error.details.filter(|d| !d.is_empty()) {
        message = format!("{message}: {details}");
    }

    match error.code {
        Some(code) if is_sqlstate(&code) => StatementError::with_sqlstate(message, code),
        _ => StatementError::new(message),
    }
}

fn is_sqlstate(code: &str) -> bool {
    code.len() == 5
        && !code.starts_with("PGRST")
        && code.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
}
