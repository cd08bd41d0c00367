//! Column layout of one table.
//!
//! Every statement kind walks a record through [`walk`], so DDL, INSERT,
//! UPDATE and SELECT agree on column names. One [`NameTracker`] spans a
//! table and every adjacent table reachable from it (see [`tables`]);
//! flattened records are folded into the walk of their parent.

use std::collections::HashSet;

use crate::dialect::Dialect;
use crate::directive::FieldDirective;
use crate::error::{Error, Result};
use crate::record::{FieldDescriptor, FieldLayout, RecordType};
use crate::tracker::NameTracker;
use crate::value::Value;

/// Where column values come from.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Source<'a> {
    /// Compiling a schema; there are no values.
    Schema,
    /// Values of one record instance, in field order.
    Row(&'a [Value]),
    /// A flattened optional record that is absent; every column is null.
    NullRow,
}

/// Value of a column in a row.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Cell<'a> {
    Value(&'a Value),
    Null,
}

/// A resolved column.
#[derive(Debug)]
pub(crate) struct Column<'a> {
    /// Final name, collision-resolved and escaped.
    pub name: String,
    pub field: &'a FieldDescriptor,
    pub owner: &'a RecordType,
    /// `None` when compiling a schema.
    pub cell: Option<Cell<'a>>,
    /// Index of the top-level field the column comes from.
    pub top_field: usize,
}

/// A nested record stored in its own table.
#[derive(Debug)]
pub(crate) struct Adjacent<'a> {
    pub record: &'static RecordType,
    /// `None` when compiling a schema.
    pub values: Option<&'a [Value]>,
}

#[derive(Debug, Default)]
pub(crate) struct Layout<'a> {
    pub columns: Vec<Column<'a>>,
    pub adjacent: Vec<Adjacent<'a>>,
}

/// Schema layout of one table.
#[derive(Debug)]
pub(crate) struct Table<'a> {
    pub name: String,
    pub record: &'a RecordType,
    pub layout: Layout<'a>,
}

/// Resolves the table of `record` and every adjacent table reachable from
/// it, children before parents, each table once.
///
/// The parent is resolved before its children and all of them share one
/// tracker, so a child column colliding with an earlier column takes its
/// owner's prefix.
pub(crate) fn tables<'a>(
    record: &'a RecordType,
    table: String,
    dialect: &dyn Dialect,
) -> Result<Vec<Table<'a>>> {
    let mut tracker = NameTracker::new();
    let mut seen = HashSet::from([table.clone()]);
    let mut tables = Vec::new();
    collect(record, table, dialect, &mut tracker, &mut seen, &mut tables)?;
    Ok(tables)
}

fn collect<'a>(
    record: &'a RecordType,
    table: String,
    dialect: &dyn Dialect,
    tracker: &mut NameTracker,
    seen: &mut HashSet<String>,
    tables: &mut Vec<Table<'a>>,
) -> Result<()> {
    let layout = walk(record, Source::Schema, dialect, tracker)?;
    for adjacent in &layout.adjacent {
        let child = adjacent.record.table_name();
        if seen.insert(child.clone()) {
            collect(adjacent.record, child, dialect, tracker, seen, tables)?;
        }
    }
    tables.push(Table {
        name: table,
        record,
        layout,
    });
    Ok(())
}

/// Resolves the columns of `record` and the adjacent tables it references.
pub(crate) fn walk<'a>(
    record: &'a RecordType,
    source: Source<'a>,
    dialect: &dyn Dialect,
    tracker: &mut NameTracker,
) -> Result<Layout<'a>> {
    let mut walker = Walker {
        dialect,
        tracker,
        path: vec![record.name().to_string()],
        layout: Layout::default(),
    };
    walker.record(record, source, None)?;
    Ok(walker.layout)
}

struct Walker<'d, 't, 'a> {
    dialect: &'d dyn Dialect,
    tracker: &'t mut NameTracker,
    /// Records being flattened, outermost first.
    path: Vec<String>,
    layout: Layout<'a>,
}

impl<'a> Walker<'_, '_, 'a> {
    fn record(
        &mut self,
        record: &'a RecordType,
        source: Source<'a>,
        top: Option<usize>,
    ) -> Result<()> {
        if let Source::Row(values) = source {
            record.check_values(values)?;
        }

        for (idx, field) in record.fields().iter().enumerate() {
            let top_field = top.unwrap_or(idx);
            let cell = match source {
                Source::Schema => None,
                Source::Row(values) => Some(Cell::Value(&values[idx])),
                Source::NullRow => Some(Cell::Null),
            };

            match field.layout() {
                FieldLayout::Skip => {}
                FieldLayout::Column => {
                    let base = field.base_column_name();
                    // untagged columns of the table itself keep their name
                    let name = if top.is_none() && *field.directive() == FieldDirective::Untagged {
                        self.tracker.register(&base);
                        base
                    } else {
                        self.tracker.resolve(&base, record.name())
                    };
                    self.layout.columns.push(Column {
                        name: self.dialect.escape_identifier(&name),
                        field,
                        owner: record,
                        cell,
                        top_field,
                    });
                }
                FieldLayout::Flatten(nested) => {
                    let nested = nested()?;
                    if self.path.iter().any(|name| name == nested.name()) {
                        return Err(Error::InvalidDirective {
                            record: record.name().to_string(),
                            field: field.name().to_string(),
                            reason: format!("'{}' is already being flattened", nested.name()),
                        });
                    }
                    let nested_source = match cell {
                        None => Source::Schema,
                        Some(Cell::Null | Cell::Value(Value::Null)) => Source::NullRow,
                        Some(Cell::Value(Value::Record(values))) => Source::Row(values),
                        Some(Cell::Value(other)) => return Err(mismatch(field, other)),
                    };
                    self.path.push(nested.name().to_string());
                    self.record(nested, nested_source, Some(top_field))?;
                    self.path.pop();
                }
                FieldLayout::Table(nested) => {
                    let nested = nested()?;
                    match cell {
                        None => self.layout.adjacent.push(Adjacent {
                            record: nested,
                            values: None,
                        }),
                        // nothing to store for an absent record
                        Some(Cell::Null | Cell::Value(Value::Null)) => {}
                        Some(Cell::Value(Value::Record(values))) => {
                            self.layout.adjacent.push(Adjacent {
                                record: nested,
                                values: Some(values),
                            });
                        }
                        Some(Cell::Value(other)) => return Err(mismatch(field, other)),
                    }
                }
            }
        }
        Ok(())
    }
}

fn mismatch(field: &FieldDescriptor, found: &Value) -> Error {
    Error::ValueKindMismatch {
        field: field.name().to_string(),
        expected: String::from("record"),
        found: found.kind_name().to_string(),
    }
}
