use std::time::Duration;

use serde_json::Value;
use sqlx::mysql::MySqlRow;
use sqlx::{Connection as _, FromRow, Row};
use thiserror::Error;
use tracing::{debug, error};

use crate::config::DatabaseConfig;
use crate::filter::{FilterError, SqlResult};

/// Errors from the connection layer. Every driver failure ends up here.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("Timed out connecting to the database after {0}s")]
    ConnectTimeout(u64),

    #[error("Could not connect to the database: {0}")]
    Connection(sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Sort a statement error into duplicate-key or generic failure
    fn from_statement(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return DatabaseError::Duplicate(db_err.message().to_string());
            }
        }
        DatabaseError::Sqlx(err)
    }
}

/// Outcome of an INSERT/UPDATE/DELETE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOutcome {
    pub rows_affected: u64,
    pub last_insert_id: u64,
}

/// Build the connection URL: `DATABASE_URL` as-is, otherwise assembled from parts
pub fn connection_url(config: &DatabaseConfig) -> Result<String, DatabaseError> {
    if let Some(url) = &config.url {
        let parsed = url::Url::parse(url).map_err(|e| DatabaseError::InvalidDatabaseUrl(e.to_string()))?;
        if parsed.scheme() != "mysql" {
            return Err(DatabaseError::InvalidDatabaseUrl(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            )));
        }
        return Ok(parsed.into());
    }

    let mut url = url::Url::parse("mysql://localhost")
        .map_err(|e| DatabaseError::InvalidDatabaseUrl(e.to_string()))?;
    url.set_host(Some(&config.host))
        .map_err(|e| DatabaseError::InvalidDatabaseUrl(e.to_string()))?;
    url.set_port(Some(config.port))
        .map_err(|_| DatabaseError::InvalidDatabaseUrl("cannot set port".to_string()))?;
    url.set_username(&config.username)
        .map_err(|_| DatabaseError::InvalidDatabaseUrl("cannot set username".to_string()))?;
    if !config.password.is_empty() {
        url.set_password(Some(&config.password))
            .map_err(|_| DatabaseError::InvalidDatabaseUrl("cannot set password".to_string()))?;
    }
    url.set_path(&format!("/{}", config.database));
    Ok(url.into())
}

/// Bind every JSON parameter, in order, onto a `Query` or `QueryAs`.
/// Arrays and objects are sent as their JSON text.
macro_rules! bind_params {
    ($query:expr, $params:expr) => {{
        let mut q = $query;
        for p in $params.iter() {
            q = match p {
                Value::Null => q.bind(None::<String>),
                Value::Bool(b) => q.bind(*b),
                Value::Number(n) => {
                    if let Some(i) = n.as_i64() {
                        q.bind(i)
                    } else if let Some(u) = n.as_u64() {
                        q.bind(u)
                    } else {
                        q.bind(n.as_f64().unwrap_or_default())
                    }
                }
                Value::String(s) => q.bind(s.as_str()),
                Value::Array(_) | Value::Object(_) => q.bind(p.to_string()),
            };
        }
        q
    }};
}

/// A single live MySQL connection. Opened per service call and closed after it.
pub struct MySqlConnection {
    conn: sqlx::MySqlConnection,
}

impl MySqlConnection {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let url = connection_url(config)?;
        let timeout = Duration::from_secs(config.connect_timeout_secs);

        let conn = tokio::time::timeout(timeout, sqlx::MySqlConnection::connect(&url))
            .await
            .map_err(|_| DatabaseError::ConnectTimeout(config.connect_timeout_secs))?
            .map_err(|e| {
                error!("Database connection failed: {}", e);
                DatabaseError::Connection(e)
            })?;

        debug!("Opened connection to {}:{}/{}", config.host, config.port, config.database);
        Ok(Self { conn })
    }

    pub async fn disconnect(self) {
        if let Err(e) = self.conn.close().await {
            // The statement already ran; a failed close only matters for the logs
            error!("Failed to close database connection: {}", e);
        }
    }

    pub async fn fetch_all<R>(&mut self, sql: &SqlResult) -> Result<Vec<R>, DatabaseError>
    where
        R: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        debug!(query = %sql.query, params = sql.params.len(), "fetch_all");
        bind_params!(sqlx::query_as::<_, R>(&sql.query), sql.params)
            .fetch_all(&mut self.conn)
            .await
            .map_err(DatabaseError::from_statement)
    }

    pub async fn fetch_optional<R>(&mut self, sql: &SqlResult) -> Result<Option<R>, DatabaseError>
    where
        R: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        debug!(query = %sql.query, params = sql.params.len(), "fetch_optional");
        bind_params!(sqlx::query_as::<_, R>(&sql.query), sql.params)
            .fetch_optional(&mut self.conn)
            .await
            .map_err(DatabaseError::from_statement)
    }

    /// Runs a `SELECT COUNT(*) AS total` statement
    pub async fn count(&mut self, sql: &SqlResult) -> Result<i64, DatabaseError> {
        debug!(query = %sql.query, params = sql.params.len(), "count");
        let row = bind_params!(sqlx::query(&sql.query), sql.params)
            .fetch_one(&mut self.conn)
            .await
            .map_err(DatabaseError::from_statement)?;
        let total: i64 = row.try_get("total")?;
        Ok(total)
    }

    pub async fn execute(&mut self, sql: &SqlResult) -> Result<ExecOutcome, DatabaseError> {
        debug!(query = %sql.query, params = sql.params.len(), "execute");
        let result = bind_params!(sqlx::query(&sql.query), sql.params)
            .execute(&mut self.conn)
            .await
            .map_err(DatabaseError::from_statement)?;
        Ok(ExecOutcome {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_id(),
        })
    }

    /// Run a script statement by statement, stopping at the first failure.
    /// MySQL commits DDL implicitly, so earlier statements stay applied.
    pub async fn execute_script(&mut self, statements: &[String]) -> Result<usize, DatabaseError> {
        for (index, statement) in statements.iter().enumerate() {
            debug!(index, "script statement");
            sqlx::query(statement)
                .execute(&mut self.conn)
                .await
                .map_err(DatabaseError::from_statement)?;
        }
        Ok(statements.len())
    }
}

/// Split a SQL script on `;`, dropping blanks and comment-only chunks
pub fn split_statements(script: &str) -> Vec<String> {
    script
        .split(';')
        .map(|chunk| {
            chunk
                .lines()
                .filter(|line| !line.trim_start().starts_with("--"))
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string()
        })
        .filter(|stmt| !stmt.is_empty())
        .collect()
}
