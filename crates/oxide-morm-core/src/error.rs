//! Error types for the record compiler.

use crate::dialect::Engine;

/// Errors that can occur while registering record types or compiling SQL.
///
/// Any error aborts construction of the statement being built; the compiler
/// never returns a partial statement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The selected engine has no dialect profile.
    #[error("engine {0} is not supported")]
    UnsupportedEngine(Engine),

    /// A field kind has no native column type in the active dialect.
    #[error("{engine} has no column type for {kind} field '{record}.{field}'")]
    UnmappedKind {
        /// Active engine.
        engine: Engine,
        /// Record owning the field.
        record: String,
        /// Declared field name.
        field: String,
        /// Human-readable kind.
        kind: String,
    },

    /// A runtime value disagrees with the field's declared kind.
    #[error("field '{field}' expects a {expected} value but got {found}")]
    ValueKindMismatch {
        /// Declared field name.
        field: String,
        /// Declared kind.
        expected: String,
        /// Kind of the runtime value.
        found: String,
    },

    /// The value kind cannot be written as a SQL literal.
    #[error("field '{field}' holds a {kind} value which has no SQL literal form")]
    UnsupportedValue {
        /// Declared field name.
        field: String,
        /// Kind of the runtime value.
        kind: String,
    },

    /// A temporal field was serialized without an encoding hint.
    #[error("temporal field '{field}' must declare an encoding (integer, real, text, date, datetime or timestamp)")]
    MissingTemporalHint {
        /// Declared field name.
        field: String,
    },

    /// A temporal field declared an encoding the serializer does not know.
    #[error("temporal field '{field}' has unknown encoding '{hint}'")]
    UnknownTemporalHint {
        /// Declared field name.
        field: String,
        /// The hint as written in the annotation.
        hint: String,
    },

    /// An update named a field the record does not have.
    #[error("record '{record}' has no field '{field}'")]
    FieldNotFound {
        /// Record name.
        record: String,
        /// Requested field name.
        field: String,
    },

    /// An update was requested without any field to set.
    #[error("update of '{0}' names no fields")]
    EmptyUpdate(String),

    /// The number of values does not match the number of fields.
    #[error("record '{record}' has {expected} fields but {found} values were supplied")]
    ValueCountMismatch {
        /// Record name.
        record: String,
        /// Field count.
        expected: usize,
        /// Value count.
        found: usize,
    },

    /// A delete was requested without a filter.
    #[error("delete from '{0}' requires a filter")]
    MissingFilter(String),

    /// A filter has no top-level comparison.
    #[error("filter has no conditions")]
    EmptyFilter,

    /// A filter group has no comparison.
    #[error("filter group has no conditions")]
    EmptyFilterGroup,

    /// An annotation starts with the directive sigil but names no known directive.
    #[error("unknown directive '{0}'")]
    UnknownDirective(String),

    /// A directive is not valid for the field it annotates.
    #[error("invalid directive on '{record}.{field}': {reason}")]
    InvalidDirective {
        /// Record name.
        record: String,
        /// Declared field name.
        field: String,
        /// Why the directive was rejected.
        reason: String,
    },
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, Error>;
