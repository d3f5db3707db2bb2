use serde_json::Value;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Arguments, FromRow};
use std::future::Future;
use std::path::Path;
use std::str::FromStr;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::DatabaseConfig;

const MEMORY_PATH: &str = ":memory:";

/// Errors from the store. Every persistence failure collapses into one of these.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to prepare database directory {path}: {source}")]
    Directory {
        path: String,
        source: std::io::Error,
    },

    #[error("Store call exceeded {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Outcome of an insert/update/delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecResult {
    pub last_insert_id: i64,
    pub rows_affected: u64,
}

/// Process-scoped handle to the SQLite database. Cloning shares the same pool.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
    path: String,
    query_timeout: Option<Duration>,
    slow_query_threshold: Option<Duration>,
}

impl Store {
    /// Open (creating if missing) the database described by `config`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let in_memory = Self::is_memory_path(&config.path);

        let options = if in_memory {
            SqliteConnectOptions::from_str("sqlite::memory:")?
        } else {
            Self::ensure_parent_dir(&config.path).await?;
            SqliteConnectOptions::new()
                .filename(&config.path)
                .create_if_missing(true)
        };
        let options = options.busy_timeout(Duration::from_secs(config.busy_timeout_secs));

        // An in-memory database lives and dies with its connection, so pin exactly one.
        let max_connections = if in_memory { 1 } else { config.max_connections.max(1) };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        info!("Opened database {} ({} connection(s))", config.path, max_connections);

        Ok(Self {
            pool,
            path: config.path.clone(),
            query_timeout: config.query_timeout_ms.map(Duration::from_millis),
            slow_query_threshold: config
                .enable_slow_query_warning
                .then(|| Duration::from_millis(config.slow_query_threshold_ms)),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Run an insert/update/delete.
    pub async fn execute(&self, sql: &str, params: &[Value]) -> Result<ExecResult, StoreError> {
        let result = self
            .bounded(sql, sqlx::query_with(sql, bind_params(params)).execute(&self.pool))
            .await?;

        Ok(ExecResult {
            last_insert_id: result.last_insert_rowid(),
            rows_affected: result.rows_affected(),
        })
    }

    /// Run a scan, returning every matching row.
    pub async fn query_all<T>(&self, sql: &str, params: &[Value]) -> Result<Vec<T>, StoreError>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        self.bounded(
            sql,
            sqlx::query_as_with::<_, T, _>(sql, bind_params(params)).fetch_all(&self.pool),
        )
        .await
    }

    /// Run a point lookup, returning the first row if any.
    pub async fn query_one<T>(&self, sql: &str, params: &[Value]) -> Result<Option<T>, StoreError>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        self.bounded(
            sql,
            sqlx::query_as_with::<_, T, _>(sql, bind_params(params)).fetch_optional(&self.pool),
        )
        .await
    }

    /// Pings the pool to ensure connectivity
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.bounded("SELECT 1", sqlx::query("SELECT 1").execute(&self.pool))
            .await
            .map(|_| ())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database {}", self.path);
    }

    async fn bounded<F, O>(&self, sql: &str, call: F) -> Result<O, StoreError>
    where
        F: Future<Output = Result<O, sqlx::Error>>,
    {
        let started = Instant::now();

        let outcome = match self.query_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!("Store call timed out after {:?}: {}", limit, sql);
                    return Err(StoreError::Timeout(limit));
                }
            },
            None => call.await,
        };

        let elapsed = started.elapsed();
        match self.slow_query_threshold {
            Some(threshold) if elapsed >= threshold => {
                warn!("Slow query ({} ms): {}", elapsed.as_millis(), sql);
            }
            _ => debug!("Query ({} us): {}", elapsed.as_micros(), sql),
        }

        Ok(outcome?)
    }

    fn is_memory_path(path: &str) -> bool {
        path == MEMORY_PATH || path.starts_with("sqlite::memory:")
    }

    async fn ensure_parent_dir(path: &str) -> Result<(), StoreError> {
        match Path::new(path).parent() {
            Some(dir) if !dir.as_os_str().is_empty() => tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| StoreError::Directory {
                    path: dir.display().to_string(),
                    source,
                }),
            _ => Ok(()),
        }
    }
}

/// Bind JSON values positionally. Values are only ever bound, never spliced into SQL text.
fn bind_params(params: &[Value]) -> SqliteArguments<'_> {
    let mut args = SqliteArguments::default();
    for value in params {
        match value {
            Value::Null => args.add(Option::<String>::None),
            Value::Bool(b) => args.add(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    args.add(i)
                } else if let Some(f) = n.as_f64() {
                    args.add(f)
                } else {
                    args.add(n.to_string())
                }
            }
            Value::String(s) => args.add(s.as_str()),
            // SQLite has no array or object type; store the JSON text
            Value::Array(_) | Value::Object(_) => args.add(value.to_string()),
        }
    }
    args
}
