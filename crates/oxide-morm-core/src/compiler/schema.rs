//! CREATE TABLE compilation.

use tracing::debug;

use super::layout::{tables, Column};
use super::Compiler;
use crate::directive::FieldDirective;
use crate::error::{Error, Result};
use crate::record::{Record, RecordType};

impl Compiler {
    /// Compiles the statements creating the table of `record`.
    ///
    /// Tables of untagged nested records are created first, each at most
    /// once. `table` overrides the name of the outermost table only.
    /// Column names are resolved across all of these tables together.
    pub fn create_table(&self, record: &RecordType, table: Option<&str>) -> Result<Vec<String>> {
        let table = table.map_or_else(|| record.table_name(), str::to_string);
        let mut statements = Vec::new();
        for table in tables(record, table, self.dialect())? {
            let columns = table
                .layout
                .columns
                .iter()
                .map(|column| self.column_definition(column))
                .collect::<Result<Vec<_>>>()?;

            for statement in self.dialect().create_table(&table.name, &columns, self.database()) {
                // the CREATE DATABASE guard is shared by every table
                if !statements.contains(&statement) {
                    debug!(sql = %statement, record = table.record.name(), "Compiled DDL");
                    statements.push(statement);
                }
            }
        }
        Ok(statements)
    }

    /// Compiles the statements creating the table of `R`.
    pub fn create_table_for<R: Record>(&self, table: Option<&str>) -> Result<Vec<String>> {
        self.create_table(R::record_type()?, table)
    }

    fn column_definition(&self, column: &Column<'_>) -> Result<String> {
        let field = column.field;
        if let FieldDirective::ExplicitColumn { clause, .. } = field.directive() {
            if clause.is_empty() {
                return Ok(column.name.clone());
            }
            return Ok(format!("{} {clause}", column.name));
        }

        field
            .kind()
            .scalar()
            .and_then(|kind| self.dialect().column_definition(&column.name, kind))
            .ok_or_else(|| Error::UnmappedKind {
                engine: self.engine(),
                record: column.owner.name().to_string(),
                field: field.name().to_string(),
                kind: field.kind().to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Engine;
    use crate::record::{FieldKind, ScalarKind};
    use std::sync::OnceLock;

    fn scalar(kind: ScalarKind) -> FieldKind {
        FieldKind::Scalar(kind)
    }

    fn email() -> Result<&'static RecordType> {
        static EMAIL: OnceLock<Result<RecordType>> = OnceLock::new();
        EMAIL
            .get_or_init(|| {
                RecordType::builder("Email")
                    .field("id", scalar(ScalarKind::Integer), "id integer PRIMARY KEY AUTOINCREMENT")
                    .field("address", scalar(ScalarKind::Text), "")
                    .build()
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    fn sqlite() -> Compiler {
        Compiler::new(Engine::Sqlite).unwrap()
    }

    #[test]
    fn test_untagged_columns() {
        let record = RecordType::builder("Movie")
            .field("Title", scalar(ScalarKind::Text), "")
            .field("Rating", scalar(ScalarKind::Float), "")
            .field("Seen", scalar(ScalarKind::Bool), "")
            .field("Cover", scalar(ScalarKind::Bytes), "")
            .field("Notes", FieldKind::Optional(Box::new(scalar(ScalarKind::Text))), "")
            .build()
            .unwrap();
        let sql = sqlite().create_table(&record, None).unwrap();
        assert_eq!(
            sql,
            vec!["CREATE TABLE IF NOT EXISTS movies (title text, rating real, seen integer CHECK (seen IN (0,1)), cover blob, notes text)"]
        );
    }

    #[test]
    fn test_explicit_clause_is_verbatim() {
        let record = RecordType::builder("Movie")
            .field("Id", scalar(ScalarKind::Text), "id text PRIMARY KEY NOT NULL")
            .field("Raw", scalar(ScalarKind::Text), "raw")
            .build()
            .unwrap();
        let sql = sqlite().create_table(&record, Some("films")).unwrap();
        assert_eq!(
            sql,
            vec!["CREATE TABLE IF NOT EXISTS films (id text PRIMARY KEY NOT NULL, raw)"]
        );
    }

    #[test]
    fn test_adjacent_tables_come_first_once() {
        let record = RecordType::builder("User")
            .field("Name", scalar(ScalarKind::Text), "")
            .field("Work", FieldKind::Record(email), "")
            .field("Home", FieldKind::Optional(Box::new(FieldKind::Record(email))), "")
            .build()
            .unwrap();
        let sql = sqlite().create_table(&record, None).unwrap();
        assert_eq!(
            sql,
            vec![
                "CREATE TABLE IF NOT EXISTS emails (id integer PRIMARY KEY AUTOINCREMENT, address text)",
                "CREATE TABLE IF NOT EXISTS users (name text)",
            ]
        );
    }

    #[test]
    fn test_flattened_columns_are_prefixed() {
        let record = RecordType::builder("User")
            .field("Id", scalar(ScalarKind::Text), "id text")
            .field("Address", scalar(ScalarKind::Text), "")
            .field("Email", FieldKind::Record(email), ":flatten")
            .build()
            .unwrap();
        let sql = sqlite().create_table(&record, None).unwrap();
        assert_eq!(
            sql,
            vec!["CREATE TABLE IF NOT EXISTS users (id text, address text, Email_id integer PRIMARY KEY AUTOINCREMENT, Email_address text)"]
        );
    }

    #[test]
    fn test_ignored_fields_are_skipped() {
        let record = RecordType::builder("User")
            .field("Name", scalar(ScalarKind::Text), "")
            .field("Cache", FieldKind::Sequence, ":ignore")
            .build()
            .unwrap();
        let sql = sqlite().create_table(&record, None).unwrap();
        assert_eq!(sql, vec!["CREATE TABLE IF NOT EXISTS users (name text)"]);
    }

    #[test]
    fn test_unmapped_kinds() {
        for kind in [FieldKind::Sequence, FieldKind::Map, scalar(ScalarKind::Timestamp)] {
            let record = RecordType::builder("Event")
                .field("At", kind, "")
                .build()
                .unwrap();
            let err = sqlite().create_table(&record, None).unwrap_err();
            assert!(
                matches!(err, Error::UnmappedKind { ref field, engine: Engine::Sqlite, .. } if field == "At")
            );
        }
    }

    #[test]
    fn test_reserved_column_is_quoted() {
        let record = RecordType::builder("Phone")
            .field("Primary", scalar(ScalarKind::Bool), "")
            .build()
            .unwrap();
        let sql = sqlite().create_table(&record, None).unwrap();
        assert_eq!(
            sql,
            vec!["CREATE TABLE IF NOT EXISTS phones (\"primary\" integer CHECK (\"primary\" IN (0,1)))"]
        );
    }

    #[test]
    fn test_sqlserver_database_guard_is_emitted_once() {
        let record = RecordType::builder("User")
            .field("Name", scalar(ScalarKind::Text), "")
            .field("Work", FieldKind::Record(email), "")
            .build()
            .unwrap();
        let compiler = Compiler::new(Engine::SqlServer)
            .unwrap()
            .with_database("crm");
        let sql = compiler.create_table(&record, None).unwrap();
        assert_eq!(sql.len(), 3);
        assert!(sql[0].starts_with("IF DB_ID(N'crm') IS NULL"));
        assert!(sql[1].contains("CREATE TABLE emails ("));
        assert!(sql[2].contains("CREATE TABLE users (name varchar(max))"));
        assert!(sql[2].starts_with("USE crm;\n\n"));
    }

    fn account() -> Result<&'static RecordType> {
        static ACCOUNT: OnceLock<Result<RecordType>> = OnceLock::new();
        ACCOUNT
            .get_or_init(|| {
                RecordType::builder("Account")
                    .field("id", scalar(ScalarKind::Integer), "id integer")
                    .field("address", scalar(ScalarKind::Text), "")
                    .build()
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    #[test]
    fn test_child_column_collides_with_parent() {
        let record = RecordType::builder("User")
            .field("id", scalar(ScalarKind::Text), "id text")
            .field("account", FieldKind::Record(account), "")
            .build()
            .unwrap();
        let sql = sqlite().create_table(&record, None).unwrap();
        assert_eq!(
            sql,
            vec![
                "CREATE TABLE IF NOT EXISTS accounts (Account_id integer, address text)",
                "CREATE TABLE IF NOT EXISTS users (id text)",
            ]
        );
    }

    #[test]
    fn test_separate_compiles_do_not_share_names() {
        let record = RecordType::builder("User")
            .field("id", scalar(ScalarKind::Text), "id text")
            .build()
            .unwrap();
        let compiler = sqlite();
        let first = compiler.create_table(&record, None).unwrap();
        let second = compiler.create_table(&record, None).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            compiler.create_table(account().unwrap(), None).unwrap(),
            vec!["CREATE TABLE IF NOT EXISTS accounts (id integer, address text)"]
        );
    }
}
