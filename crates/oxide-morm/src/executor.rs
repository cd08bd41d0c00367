//! Statement chain execution.
//!
//! Compiled statements are handed to an [`Executor`] as a chain. A chain
//! runs inside one transaction: either every statement applies or none do.

use std::str::FromStr;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::error::Result;

/// Outcome of an executed chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryResult {
    /// Rows affected, summed over every statement of the chain.
    pub rows_affected: u64,
}

/// Runs compiled statements against a database.
#[allow(async_fn_in_trait)]
pub trait Executor {
    /// Runs `statements` in order inside one transaction.
    async fn execute(&self, statements: &[String]) -> Result<QueryResult>;
}

/// Executor backed by a lazily opened SQLite pool.
#[derive(Debug)]
pub struct SqliteExecutor {
    url: String,
    max_connections: u32,
    pool: OnceCell<SqlitePool>,
}

impl SqliteExecutor {
    /// Creates an executor that connects to `url` on first use.
    pub fn new(url: impl Into<String>, max_connections: u32) -> Self {
        Self {
            url: url.into(),
            max_connections,
            pool: OnceCell::new(),
        }
    }

    /// Creates an executor over an existing pool.
    #[must_use]
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            url: String::new(),
            max_connections: pool.options().get_max_connections(),
            pool: OnceCell::new_with(Some(pool)),
        }
    }

    /// Returns the pool, connecting if needed.
    ///
    /// Concurrent first calls share a single connection attempt.
    pub async fn pool(&self) -> Result<&SqlitePool> {
        self.pool.get_or_try_init(|| self.connect()).await
    }

    /// Returns whether the pool has been opened.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.pool.initialized()
    }

    async fn connect(&self) -> Result<SqlitePool> {
        info!(url = %self.url, max_connections = self.max_connections, "Opening SQLite pool");
        let options = SqliteConnectOptions::from_str(&self.url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Full);
        let pool = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(options)
            .await?;
        Ok(pool)
    }
}

impl Executor for SqliteExecutor {
    async fn execute(&self, statements: &[String]) -> Result<QueryResult> {
        if statements.is_empty() {
            warn!("Empty statement chain, skipping");
            return Ok(QueryResult::default());
        }

        let pool = self.pool().await?;
        let mut tx = pool.begin().await?;
        let mut rows_affected = 0;
        for sql in statements {
            debug!(sql = %sql, "Executing SQL");
            rows_affected += sqlx::query(sql).execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;

        debug!(statements = statements.len(), rows_affected, "Chain committed");
        Ok(QueryResult { rows_affected })
    }
}
