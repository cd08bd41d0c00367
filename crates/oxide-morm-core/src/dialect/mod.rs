//! SQL dialect profiles.
//!
//! A dialect maps field kinds to native column types and knows the engine's
//! DDL and DML templates. One profile is selected per [`Compiler`] through an
//! [`Engine`] and never changes afterwards.
//!
//! [`Compiler`]: crate::Compiler

pub mod keywords;
mod sqlite;
mod sqlserver;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use sqlite::SqliteDialect;
pub use sqlserver::SqlServerDialect;

use crate::error::{Error, Result};
use crate::record::ScalarKind;

/// Supported database engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// SQLite.
    Sqlite,
    /// Microsoft SQL Server.
    SqlServer,
    /// PostgreSQL (no dialect profile yet).
    Postgres,
    /// MySQL (no dialect profile yet).
    MySql,
}

impl Engine {
    /// Returns the lowercase engine name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::SqlServer => "sqlserver",
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
        }
    }

    /// Parses an engine name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sqlite" => Some(Self::Sqlite),
            "sqlserver" | "mssql" => Some(Self::SqlServer),
            "postgres" | "postgresql" => Some(Self::Postgres),
            "mysql" => Some(Self::MySql),
            _ => None,
        }
    }

    /// Returns the dialect profile for this engine.
    pub fn dialect(self) -> Result<Box<dyn Dialect>> {
        match self {
            Self::Sqlite => Ok(Box::new(SqliteDialect::new())),
            Self::SqlServer => Ok(Box::new(SqlServerDialect::new())),
            Self::Postgres | Self::MySql => Err(Error::UnsupportedEngine(self)),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine-specific SQL generation.
pub trait Dialect: fmt::Debug + Send + Sync {
    /// Returns the engine this profile belongs to.
    fn engine(&self) -> Engine;

    /// Returns the native column type for a primitive kind.
    fn column_type(&self, kind: ScalarKind) -> Option<&'static str>;

    /// Generates the column definition for an untagged field.
    ///
    /// `column` is already escaped.
    fn column_definition(&self, column: &str, kind: ScalarKind) -> Option<String> {
        self.column_type(kind).map(|ty| format!("{column} {ty}"))
    }

    /// Quotes an identifier.
    fn quote_identifier(&self, name: &str) -> String;

    /// Quotes `name` only if it is a reserved word.
    fn escape_identifier(&self, name: &str) -> String {
        if keywords::is_reserved(name) {
            self.quote_identifier(name)
        } else {
            name.to_string()
        }
    }

    /// Returns the literal form of a byte array.
    fn binary_literal(&self, bytes: &[u8]) -> String;

    /// Generates the statements creating `table` if it does not exist.
    ///
    /// Statements that must run first (such as creating the database) come
    /// before the table statement.
    fn create_table(&self, table: &str, columns: &[String], database: Option<&str>)
        -> Vec<String>;

    /// Scopes a DML statement to `database`.
    fn scope(&self, statement: String, _database: Option<&str>) -> String {
        statement
    }

    /// Generates a SELECT projection.
    fn select(
        &self,
        columns: &[String],
        table: &str,
        where_clause: Option<&str>,
        single: bool,
    ) -> String;

    /// Generates the statement dropping `table`.
    fn drop_table(&self, table: &str) -> String {
        format!("drop table {table}")
    }
}

/// Hex digits of `bytes` in uppercase.
pub(crate) fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02X}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_dialects() {
        assert_eq!(Engine::Sqlite.dialect().unwrap().engine(), Engine::Sqlite);
        assert_eq!(
            Engine::SqlServer.dialect().unwrap().engine(),
            Engine::SqlServer
        );
        assert_eq!(
            Engine::Postgres.dialect().unwrap_err(),
            Error::UnsupportedEngine(Engine::Postgres)
        );
        assert_eq!(
            Engine::MySql.dialect().unwrap_err(),
            Error::UnsupportedEngine(Engine::MySql)
        );
    }

    #[test]
    fn test_engine_names() {
        assert_eq!(Engine::from_name("SQLite"), Some(Engine::Sqlite));
        assert_eq!(Engine::from_name("mssql"), Some(Engine::SqlServer));
        assert_eq!(Engine::from_name("oracle"), None);
        assert_eq!(Engine::SqlServer.to_string(), "sqlserver");
    }

    #[test]
    fn test_column_type_is_pure() {
        for engine in [Engine::Sqlite, Engine::SqlServer] {
            let dialect = engine.dialect().unwrap();
            for kind in [
                ScalarKind::Integer,
                ScalarKind::Unsigned,
                ScalarKind::Float,
                ScalarKind::Text,
                ScalarKind::Bool,
                ScalarKind::Bytes,
                ScalarKind::Timestamp,
            ] {
                assert_eq!(dialect.column_type(kind), dialect.column_type(kind));
            }
        }
    }

    #[test]
    fn test_hex() {
        assert_eq!(hex(&[0x0A, 0xFF]), "0AFF");
        assert_eq!(hex(&[]), "");
    }
}
