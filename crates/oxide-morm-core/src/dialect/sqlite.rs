//! SQLite dialect.

use super::{hex, Dialect, Engine};
use crate::record::ScalarKind;

/// SQLite dialect profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn engine(&self) -> Engine {
        Engine::Sqlite
    }

    fn column_type(&self, kind: ScalarKind) -> Option<&'static str> {
        // SQLite has dynamic typing with type affinity
        match kind {
            ScalarKind::Integer | ScalarKind::Unsigned | ScalarKind::Bool => Some("integer"),
            ScalarKind::Float => Some("real"),
            ScalarKind::Text => Some("text"),
            ScalarKind::Bytes => Some("blob"),
            ScalarKind::Timestamp => None,
        }
    }

    fn column_definition(&self, column: &str, kind: ScalarKind) -> Option<String> {
        let ty = self.column_type(kind)?;
        if kind == ScalarKind::Bool {
            // no boolean type, store 0/1
            return Some(format!("{column} {ty} CHECK ({column} IN (0,1))"));
        }
        Some(format!("{column} {ty}"))
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{name}\"")
    }

    fn binary_literal(&self, bytes: &[u8]) -> String {
        format!("X'{}'", hex(bytes))
    }

    fn create_table(
        &self,
        table: &str,
        columns: &[String],
        _database: Option<&str>,
    ) -> Vec<String> {
        vec![format!(
            "CREATE TABLE IF NOT EXISTS {table} ({})",
            columns.join(", ")
        )]
    }

    fn select(
        &self,
        columns: &[String],
        table: &str,
        where_clause: Option<&str>,
        single: bool,
    ) -> String {
        let mut sql = format!("select {}\nfrom {table}", columns.join(", "));
        if let Some(where_clause) = where_clause {
            sql.push('\n');
            sql.push_str(where_clause);
        }
        if single {
            sql.push_str("\nLIMIT 1");
        }
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialect() -> SqliteDialect {
        SqliteDialect::new()
    }

    #[test]
    fn test_type_names() {
        let d = dialect();
        assert_eq!(d.column_type(ScalarKind::Integer), Some("integer"));
        assert_eq!(d.column_type(ScalarKind::Text), Some("text"));
        assert_eq!(d.column_type(ScalarKind::Float), Some("real"));
        assert_eq!(d.column_type(ScalarKind::Bytes), Some("blob"));
        assert_eq!(d.column_type(ScalarKind::Timestamp), None);
    }

    #[test]
    fn test_bool_column_has_check() {
        assert_eq!(
            dialect().column_definition("active", ScalarKind::Bool),
            Some("active integer CHECK (active IN (0,1))".to_string())
        );
    }

    #[test]
    fn test_escape_identifier() {
        let d = dialect();
        assert_eq!(d.escape_identifier("primary"), "\"primary\"");
        assert_eq!(d.escape_identifier("number"), "number");
    }

    #[test]
    fn test_create_table() {
        let sql = dialect().create_table(
            "users",
            &["id text".to_string(), "age integer".to_string()],
            Some("ignored"),
        );
        assert_eq!(
            sql,
            vec!["CREATE TABLE IF NOT EXISTS users (id text, age integer)".to_string()]
        );
    }

    #[test]
    fn test_select() {
        let d = dialect();
        let cols = ["id".to_string(), "name".to_string()];
        assert_eq!(
            d.select(&cols, "users", Some("where id=1"), true),
            "select id, name\nfrom users\nwhere id=1\nLIMIT 1"
        );
        assert_eq!(d.select(&cols, "users", None, false), "select id, name\nfrom users");
    }

    #[test]
    fn test_binary_literal() {
        assert_eq!(dialect().binary_literal(&[0xCA, 0xFE]), "X'CAFE'");
    }
}
