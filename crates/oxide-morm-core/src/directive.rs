//! Field annotation parsing.
//!
//! A field annotation is one of:
//!
//! - `""`: untagged, the column is derived from the field name and kind
//! - `":ignore"` / `":flatten"`: a directive
//! - `"<column> <type clause...>"`: an explicit column; the second token
//!   doubles as the encoding hint for temporal values

use crate::error::{Error, Result};

/// Sigil that starts a directive annotation.
pub const DIRECTIVE_SIGIL: char = ':';

/// Directive excluding a field from every statement.
pub const IGNORE_DIRECTIVE: &str = ":ignore";

/// Directive folding a nested record's columns into its parent.
pub const FLATTEN_DIRECTIVE: &str = ":flatten";

/// Marker that keeps a column out of INSERT statements.
const AUTOINCREMENT_MARKER: &str = "autoincrement";

/// Parsed form of a field annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldDirective {
    /// No annotation.
    Untagged,
    /// Annotation supplying the column name and SQL type clause verbatim.
    ExplicitColumn {
        /// Column name (token 0).
        name: String,
        /// Token 1, if any; selects temporal encodings.
        type_hint: Option<String>,
        /// Everything after the column name, used as-is in DDL.
        clause: String,
    },
    /// `:ignore`
    Ignore,
    /// `:flatten`
    Flatten,
}

impl FieldDirective {
    /// Parses a raw annotation string.
    ///
    /// The SQL type clause is not validated; a malformed clause surfaces as
    /// an execution error.
    pub fn parse(annotation: &str) -> Result<Self> {
        let trimmed = annotation.trim();
        if trimmed.is_empty() {
            return Ok(Self::Untagged);
        }

        if trimmed.starts_with(DIRECTIVE_SIGIL) {
            return match trimmed {
                IGNORE_DIRECTIVE => Ok(Self::Ignore),
                FLATTEN_DIRECTIVE => Ok(Self::Flatten),
                other => Err(Error::UnknownDirective(other.to_string())),
            };
        }

        let mut tokens = trimmed.split_whitespace();
        // non-empty after trim, so there is always a first token
        let name = tokens.next().unwrap_or_default().to_string();
        let type_hint = tokens.next().map(str::to_string);
        let clause = trimmed[name.len()..].trim_start().to_string();

        Ok(Self::ExplicitColumn {
            name,
            type_hint,
            clause,
        })
    }

    /// Returns the explicit column name, if any.
    #[must_use]
    pub fn column_name(&self) -> Option<&str> {
        match self {
            Self::ExplicitColumn { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns the temporal encoding hint, if any.
    #[must_use]
    pub fn type_hint(&self) -> Option<&str> {
        match self {
            Self::ExplicitColumn { type_hint, .. } => type_hint.as_deref(),
            _ => None,
        }
    }

    /// Returns whether the explicit clause marks an engine-generated column.
    #[must_use]
    pub fn is_autoincrement(&self) -> bool {
        match self {
            Self::ExplicitColumn { clause, .. } => clause
                .to_ascii_lowercase()
                .contains(AUTOINCREMENT_MARKER),
            _ => false,
        }
    }
}
