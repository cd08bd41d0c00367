//! SQL Server dialect.
//!
//! SQL Server has no `CREATE ... IF NOT EXISTS`, so creation is guarded with
//! `DB_ID` / `OBJECT_ID` checks. When a database name is configured, every
//! statement is prefixed with `USE <database>;`.

use super::{hex, Dialect, Engine};
use crate::record::ScalarKind;

/// SQL Server dialect profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerDialect;

impl SqlServerDialect {
    /// Creates a new SQL Server dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Generates the guarded `CREATE DATABASE` statement.
    #[must_use]
    pub fn create_database(&self, database: &str) -> String {
        format!("IF DB_ID(N'{database}') IS NULL\nBEGIN\n    CREATE DATABASE {database};\nEND;")
    }
}

impl Dialect for SqlServerDialect {
    fn engine(&self) -> Engine {
        Engine::SqlServer
    }

    fn column_type(&self, kind: ScalarKind) -> Option<&'static str> {
        match kind {
            ScalarKind::Integer | ScalarKind::Unsigned => Some("bigint"),
            ScalarKind::Float => Some("float"),
            ScalarKind::Text => Some("varchar(max)"),
            ScalarKind::Bool => Some("bit"),
            ScalarKind::Bytes => Some("varbinary(max)"),
            ScalarKind::Timestamp => None,
        }
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("[{name}]")
    }

    fn binary_literal(&self, bytes: &[u8]) -> String {
        format!("0x{}", hex(bytes))
    }

    fn create_table(&self, table: &str, columns: &[String], database: Option<&str>) -> Vec<String> {
        let mut statements = Vec::with_capacity(2);
        if let Some(database) = database {
            statements.push(self.create_database(database));
        }
        let create = format!(
            "IF OBJECT_ID('{table}', 'U') IS NULL\nBEGIN\n    CREATE TABLE {table} ({})\nEND",
            columns.join(", ")
        );
        statements.push(self.scope(create, database));
        statements
    }

    fn scope(&self, statement: String, database: Option<&str>) -> String {
        match database {
            Some(database) => format!("USE {database};\n\n{statement}"),
            None => statement,
        }
    }

    fn select(
        &self,
        columns: &[String],
        table: &str,
        where_clause: Option<&str>,
        single: bool,
    ) -> String {
        let mut sql = String::from("select ");
        if single {
            sql.push_str("top(1) ");
        }
        sql.push_str(&columns.join(", "));
        sql.push_str("\nfrom ");
        sql.push_str(table);
        if let Some(where_clause) = where_clause {
            sql.push('\n');
            sql.push_str(where_clause);
        }
        sql
    }
}
