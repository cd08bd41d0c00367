//! Statement compiler.
//!
//! A [`Compiler`] is bound to one engine (and optionally a database name)
//! when it is created. It holds no other state: every call gets its own
//! column name trackers, so compiles are deterministic and independent.

mod layout;
mod schema;
mod statement;

pub use statement::SelectTarget;

use crate::dialect::{Dialect, Engine};
use crate::error::Result;

/// Compiles record types and values into SQL statements.
#[derive(Debug)]
pub struct Compiler {
    dialect: Box<dyn Dialect>,
    database: Option<String>,
}

impl Compiler {
    /// Creates a compiler for `engine`.
    ///
    /// Fails with [`Error::UnsupportedEngine`](crate::Error::UnsupportedEngine)
    /// for engines without a dialect profile.
    pub fn new(engine: Engine) -> Result<Self> {
        Ok(Self {
            dialect: engine.dialect()?,
            database: None,
        })
    }

    /// Scopes generated statements to `database`.
    ///
    /// Only SQL Server uses it: tables are created inside the database
    /// (creating it first when missing) and DML is prefixed with `USE`.
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Returns the engine.
    #[must_use]
    pub fn engine(&self) -> Engine {
        self.dialect.engine()
    }

    /// Returns the dialect profile.
    #[must_use]
    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    /// Returns the configured database name.
    #[must_use]
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    fn scope(&self, statement: String) -> String {
        self.dialect.scope(statement, self.database())
    }
}
