//! Record-level client.

use oxide_morm_core::{Compiler, Engine, Filter, Record, SelectTarget};
use tracing::info;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::executor::{Executor, QueryResult, SqliteExecutor};

/// Compiles record operations and runs them through an executor.
#[derive(Debug)]
pub struct Client<E = SqliteExecutor> {
    compiler: Compiler,
    executor: E,
}

impl Client<SqliteExecutor> {
    /// Creates a client from a configuration.
    ///
    /// No connection is opened until the first statement runs.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        if config.engine != Engine::Sqlite {
            return Err(ClientError::NoExecutor(config.engine));
        }
        Ok(Self::new(
            config.compiler()?,
            SqliteExecutor::new(config.url.clone(), config.max_connections),
        ))
    }
}

impl<E: Executor> Client<E> {
    /// Creates a client from its parts.
    pub fn new(compiler: Compiler, executor: E) -> Self {
        Self { compiler, executor }
    }

    /// Returns the compiler.
    #[must_use]
    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    /// Returns the executor.
    #[must_use]
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Creates the table of `R`, and the tables of its nested records.
    pub async fn create_table<R: Record>(&self) -> Result<QueryResult> {
        let statements = self.compiler.create_table_for::<R>(None)?;
        let result = self.executor.execute(&statements).await?;
        info!(record = R::record_type()?.name(), tables = statements.len(), "Created tables");
        Ok(result)
    }

    /// Inserts `value` into the default table of `R`.
    pub async fn insert<R: Record>(&self, value: &R) -> Result<QueryResult> {
        let statements = self.compiler.insert_record(value, None)?;
        self.executor.execute(&statements).await
    }

    /// Inserts `value` into `table`.
    ///
    /// Nested records stored in their own tables still go to their default
    /// tables.
    pub async fn insert_into<R: Record>(&self, table: &str, value: &R) -> Result<QueryResult> {
        let statements = self.compiler.insert_record(value, Some(table))?;
        self.executor.execute(&statements).await
    }

    /// Updates `fields` of the rows matching `filter` from `value`.
    pub async fn update<R: Record>(
        &self,
        value: &R,
        filter: Option<&Filter>,
        fields: &[&str],
    ) -> Result<QueryResult> {
        let statement = self.compiler.update_record(value, filter, fields, None)?;
        self.executor.execute(&[statement]).await
    }

    /// Deletes the rows of `R` matching `filter`.
    pub async fn delete<R: Record>(&self, filter: Option<&Filter>) -> Result<QueryResult> {
        let statement = self.compiler.delete_for::<R>(filter)?;
        self.executor.execute(&[statement]).await
    }

    /// Deletes the rows of `table` matching `filter`.
    pub async fn delete_from(&self, table: &str, filter: Option<&Filter>) -> Result<QueryResult> {
        let statement = self.compiler.delete(table, filter)?;
        self.executor.execute(&[statement]).await
    }

    /// Drops the table of `R`.
    pub async fn drop<R: Record>(&self) -> Result<QueryResult> {
        let statement = self.compiler.drop_for::<R>()?;
        self.executor.execute(&[statement]).await
    }

    /// Drops `table`.
    pub async fn drop_table(&self, table: &str) -> Result<QueryResult> {
        let statement = self.compiler.drop_table(table);
        self.executor.execute(&[statement]).await
    }

    /// Compiles a SELECT for `R`. Reading rows back is left to the caller.
    pub fn select_sql<R: Record>(
        &self,
        filter: Option<&Filter>,
        target: SelectTarget,
    ) -> Result<String> {
        Ok(self.compiler.select_for::<R>(filter, target)?)
    }

    /// Runs raw statements as one chain.
    pub async fn execute(&self, statements: &[String]) -> Result<QueryResult> {
        self.executor.execute(statements).await
    }
}
