//! INSERT, UPDATE, DELETE, SELECT and DROP compilation.

use std::collections::HashMap;

use tracing::debug;

use super::layout::{tables, walk, Cell, Column, Source};
use super::Compiler;
use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::record::{FieldLayout, Record, RecordType};
use crate::serialize::serialize;
use crate::tracker::NameTracker;
use crate::value::Value;

/// Resolved column names per table, as created by the same top-level record.
type ColumnNames = HashMap<String, Vec<String>>;

/// How many rows a SELECT asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectTarget {
    /// At most one row.
    One,
    /// Every matching row.
    Many,
}

impl Compiler {
    /// Compiles the INSERT chain for one record instance.
    ///
    /// The first statement inserts into `table` (or the default table of
    /// `record`). Present untagged nested records follow depth-first, each
    /// into its own default table.
    pub fn insert(
        &self,
        record: &RecordType,
        values: &[Value],
        table: Option<&str>,
    ) -> Result<Vec<String>> {
        let table = table.map_or_else(|| record.table_name(), str::to_string);
        let names: ColumnNames = tables(record, table.clone(), self.dialect())?
            .into_iter()
            .map(|table| {
                let columns = table.layout.columns.into_iter().map(|c| c.name).collect();
                (table.name, columns)
            })
            .collect();
        let mut chain = Vec::new();
        self.insert_into(record, values, &table, &names, &mut chain)?;
        Ok(chain)
    }

    /// Compiles the INSERT chain for `value`.
    pub fn insert_record<R: Record>(&self, value: &R, table: Option<&str>) -> Result<Vec<String>> {
        self.insert(R::record_type()?, &value.values(), table)
    }

    fn insert_into(
        &self,
        record: &RecordType,
        values: &[Value],
        table: &str,
        names: &ColumnNames,
        chain: &mut Vec<String>,
    ) -> Result<()> {
        let layout = walk(record, Source::Row(values), self.dialect(), &mut NameTracker::new())?;
        // a row walk yields the columns of the schema walk, in the same order
        let resolved = names.get(table);

        let mut columns = Vec::with_capacity(layout.columns.len());
        let mut literals = Vec::with_capacity(layout.columns.len());
        for (idx, column) in layout.columns.iter().enumerate() {
            if column.field.directive().is_autoincrement() {
                continue;
            }
            let name = resolved
                .and_then(|names| names.get(idx))
                .unwrap_or(&column.name);
            columns.push(name.as_str());
            literals.push(self.literal(column)?);
        }

        let statement = if columns.is_empty() {
            format!("insert into {table} default values")
        } else {
            format!(
                "insert into {table}({})\nvalues ({})",
                columns.join(", "),
                literals.join(", ")
            )
        };
        let statement = self.scope(statement);
        debug!(sql = %statement, record = record.name(), "Compiled INSERT");
        chain.push(statement);

        for adjacent in &layout.adjacent {
            if let Some(values) = adjacent.values {
                let child = adjacent.record.table_name();
                self.insert_into(adjacent.record, values, &child, names, chain)?;
            }
        }
        Ok(())
    }

    /// Compiles an UPDATE setting `fields` from `values`.
    ///
    /// Fields are named by their declared names, in the order given. A
    /// flattened field sets every column of the nested record.
    pub fn update(
        &self,
        record: &RecordType,
        values: &[Value],
        filter: Option<&Filter>,
        fields: &[&str],
        table: Option<&str>,
    ) -> Result<String> {
        if fields.is_empty() {
            return Err(Error::EmptyUpdate(record.name().to_string()));
        }

        let mut selected = Vec::with_capacity(fields.len());
        for &name in fields {
            let (idx, _) = record
                .field(name)
                .filter(|(_, field)| matches!(field.layout(), FieldLayout::Column | FieldLayout::Flatten(_)))
                .ok_or_else(|| Error::FieldNotFound {
                    record: record.name().to_string(),
                    field: name.to_string(),
                })?;
            selected.push(idx);
        }

        let layout = walk(record, Source::Row(values), self.dialect(), &mut NameTracker::new())?;
        let mut assignments = Vec::new();
        for idx in selected {
            for column in layout.columns.iter().filter(|c| c.top_field == idx) {
                assignments.push(format!("{}={}", column.name, self.literal(column)?));
            }
        }
        if assignments.is_empty() {
            return Err(Error::EmptyUpdate(record.name().to_string()));
        }

        let table = table.map_or_else(|| record.table_name(), str::to_string);
        let mut statement = format!("update {table}\nset {}", assignments.join(","));
        if let Some(filter) = filter {
            statement.push('\n');
            statement.push_str(&filter.to_sql(self.dialect())?);
        }
        let statement = self.scope(statement);
        debug!(sql = %statement, record = record.name(), "Compiled UPDATE");
        Ok(statement)
    }

    /// Compiles an UPDATE of `fields` from `value`.
    pub fn update_record<R: Record>(
        &self,
        value: &R,
        filter: Option<&Filter>,
        fields: &[&str],
        table: Option<&str>,
    ) -> Result<String> {
        self.update(R::record_type()?, &value.values(), filter, fields, table)
    }

    /// Compiles a DELETE from `table`.
    ///
    /// A filter is required; there is no unfiltered delete.
    pub fn delete(&self, table: &str, filter: Option<&Filter>) -> Result<String> {
        let filter = filter.ok_or_else(|| Error::MissingFilter(table.to_string()))?;
        let statement = self.scope(format!(
            "delete from {table}\n{}",
            filter.to_sql(self.dialect())?
        ));
        debug!(sql = %statement, "Compiled DELETE");
        Ok(statement)
    }

    /// Compiles a DELETE from the default table of `R`.
    pub fn delete_for<R: Record>(&self, filter: Option<&Filter>) -> Result<String> {
        self.delete(&R::record_type()?.table_name(), filter)
    }

    /// Compiles a SELECT of the columns of `record`.
    pub fn select(
        &self,
        record: &RecordType,
        filter: Option<&Filter>,
        target: SelectTarget,
        table: Option<&str>,
    ) -> Result<String> {
        let layout = walk(record, Source::Schema, self.dialect(), &mut NameTracker::new())?;
        let columns: Vec<String> = layout.columns.into_iter().map(|c| c.name).collect();
        let where_clause = filter.map(|f| f.to_sql(self.dialect())).transpose()?;
        let table = table.map_or_else(|| record.table_name(), str::to_string);

        let statement = self.scope(self.dialect().select(
            &columns,
            &table,
            where_clause.as_deref(),
            target == SelectTarget::One,
        ));
        debug!(sql = %statement, record = record.name(), "Compiled SELECT");
        Ok(statement)
    }

    /// Compiles a SELECT of the columns of `R`.
    pub fn select_for<R: Record>(
        &self,
        filter: Option<&Filter>,
        target: SelectTarget,
    ) -> Result<String> {
        self.select(R::record_type()?, filter, target, None)
    }

    /// Compiles a DROP TABLE.
    #[must_use]
    pub fn drop_table(&self, table: &str) -> String {
        let statement = self.scope(self.dialect().drop_table(table));
        debug!(sql = %statement, "Compiled DROP");
        statement
    }

    /// Compiles a DROP TABLE of the default table of `R`.
    pub fn drop_for<R: Record>(&self) -> Result<String> {
        Ok(self.drop_table(&R::record_type()?.table_name()))
    }

    fn literal(&self, column: &Column<'_>) -> Result<String> {
        match column.cell {
            Some(Cell::Value(value)) => serialize(
                column.field.name(),
                value,
                column.field.kind(),
                column.field.directive().type_hint(),
                self.dialect(),
            ),
            Some(Cell::Null) | None => Ok(String::from("null")),
        }
    }
}
