//! Record type descriptors.
//!
//! A [`RecordType`] describes a Rust struct as an ordered list of fields,
//! each with a kind, a parsed annotation and a layout. Descriptors are built
//! once per type (usually by `#[derive(Record)]`) and never change afterwards.

use std::fmt;

use crate::directive::FieldDirective;
use crate::error::{Error, Result};
use crate::value::Value;

/// Primitive field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Signed integers.
    Integer,
    /// Unsigned integers.
    Unsigned,
    /// Floating point numbers.
    Float,
    /// Strings.
    Text,
    /// Booleans.
    Bool,
    /// Fixed-size byte arrays.
    Bytes,
    /// Points in time.
    Timestamp,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Integer => "integer",
            Self::Unsigned => "unsigned integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::Bool => "boolean",
            Self::Bytes => "bytes",
            Self::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// Lazily resolved nested record descriptor.
pub type RecordRef = fn() -> Result<&'static RecordType>;

/// Kind of a record field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// A primitive value.
    Scalar(ScalarKind),
    /// An optional value; `None` is written as `null`.
    Optional(Box<FieldKind>),
    /// A nested record.
    Record(RecordRef),
    /// A sequence of values.
    Sequence,
    /// A key/value map.
    Map,
    /// A type the compiler does not inspect. Only ignored fields use it.
    Opaque,
}

impl FieldKind {
    /// Returns the nested record, looking through optionals.
    #[must_use]
    pub fn record(&self) -> Option<RecordRef> {
        match self {
            Self::Record(record) => Some(*record),
            Self::Optional(inner) => inner.record(),
            _ => None,
        }
    }

    /// Returns the scalar kind, looking through optionals.
    #[must_use]
    pub fn scalar(&self) -> Option<ScalarKind> {
        match self {
            Self::Scalar(kind) => Some(*kind),
            Self::Optional(inner) => inner.scalar(),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => kind.fmt(f),
            Self::Optional(inner) => write!(f, "optional {inner}"),
            Self::Record(_) => f.write_str("record"),
            Self::Sequence => f.write_str("sequence"),
            Self::Map => f.write_str("map"),
            Self::Opaque => f.write_str("opaque"),
        }
    }
}

/// How a field takes part in the generated SQL, decided at registration.
#[derive(Debug, Clone)]
pub enum FieldLayout {
    /// The field is ignored.
    Skip,
    /// The field is one column of the owning table.
    Column,
    /// The nested record's columns are folded into the owning table.
    Flatten(RecordRef),
    /// The nested record is stored in its own, adjacent table.
    Table(RecordRef),
}

/// One field of a record type.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    kind: FieldKind,
    directive: FieldDirective,
    layout: FieldLayout,
}

impl FieldDescriptor {
    /// Returns the declared field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field kind.
    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Returns the parsed annotation.
    #[must_use]
    pub fn directive(&self) -> &FieldDirective {
        &self.directive
    }

    /// Returns the resolved layout.
    #[must_use]
    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    /// Returns the column name before collision resolution and escaping.
    #[must_use]
    pub fn base_column_name(&self) -> String {
        self.directive
            .column_name()
            .map_or_else(|| self.name.to_lowercase(), str::to_string)
    }
}

/// Description of a record type.
#[derive(Debug, Clone)]
pub struct RecordType {
    name: String,
    table: Option<String>,
    fields: Vec<FieldDescriptor>,
}

impl RecordType {
    /// Starts building a record type with the given type name.
    pub fn builder(name: impl Into<String>) -> RecordTypeBuilder {
        RecordTypeBuilder {
            name: name.into(),
            table: None,
            fields: Vec::new(),
            error: None,
        }
    }

    /// Returns the type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Looks up a field by its declared name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<(usize, &FieldDescriptor)> {
        self.fields.iter().enumerate().find(|(_, f)| f.name == name)
    }

    /// Returns the table name used when no override is given.
    ///
    /// Defaults to the lower-cased type name with an `s` appended unless it
    /// already ends in `s`.
    #[must_use]
    pub fn table_name(&self) -> String {
        if let Some(ref table) = self.table {
            return table.clone();
        }
        let mut name = self.name.to_lowercase();
        if !name.ends_with('s') {
            name.push('s');
        }
        name
    }

    /// Checks that `values` lines up with the fields.
    pub(crate) fn check_values(&self, values: &[Value]) -> Result<()> {
        if values.len() == self.fields.len() {
            Ok(())
        } else {
            Err(Error::ValueCountMismatch {
                record: self.name.clone(),
                expected: self.fields.len(),
                found: values.len(),
            })
        }
    }
}

/// Builder for [`RecordType`].
///
/// The first invalid annotation is remembered and reported by
/// [`build`](Self::build).
#[derive(Debug)]
pub struct RecordTypeBuilder {
    name: String,
    table: Option<String>,
    fields: Vec<FieldDescriptor>,
    error: Option<Error>,
}

impl RecordTypeBuilder {
    /// Overrides the default table name.
    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Adds a field with its raw annotation.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind, annotation: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        let name = name.into();
        let resolved = FieldDirective::parse(annotation).and_then(|d| self.resolve(&name, &kind, d));
        match resolved {
            Ok((directive, layout)) => self.fields.push(FieldDescriptor {
                name,
                kind,
                directive,
                layout,
            }),
            Err(e) => self.error = Some(e),
        }
        self
    }

    fn resolve(
        &self,
        field: &str,
        kind: &FieldKind,
        directive: FieldDirective,
    ) -> Result<(FieldDirective, FieldLayout)> {
        let layout = match (&directive, kind.record()) {
            (FieldDirective::Ignore, _) => FieldLayout::Skip,
            (FieldDirective::Flatten, Some(record)) => FieldLayout::Flatten(record),
            (FieldDirective::Flatten, None) => {
                return Err(Error::InvalidDirective {
                    record: self.name.clone(),
                    field: field.to_string(),
                    reason: format!("cannot flatten a {kind} field"),
                });
            }
            (FieldDirective::Untagged, Some(record)) => FieldLayout::Table(record),
            _ => FieldLayout::Column,
        };
        Ok((directive, layout))
    }

    /// Finishes the record type.
    pub fn build(self) -> Result<RecordType> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(RecordType {
            name: self.name,
            table: self.table,
            fields: self.fields,
        })
    }
}

/// A Rust type that maps to a record.
///
/// Implemented by `#[derive(Record)]`.
pub trait Record {
    /// Returns the cached descriptor of this type.
    fn record_type() -> Result<&'static RecordType>;

    /// Returns the field values in declaration order.
    fn values(&self) -> Vec<Value>;
}
