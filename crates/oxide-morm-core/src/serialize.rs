//! SQL literal serialization of field values.

use chrono::{DateTime, Utc};

use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::record::{FieldKind, ScalarKind};
use crate::value::Value;

/// Julian day number of the Unix epoch used by the `real` encoding.
const UNIX_EPOCH_JULIAN_DAY: f64 = 2_440_587.7;

const NANOS_PER_DAY: f64 = 86_400e9;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const TIME_FORMAT: &str = "%H:%M:%S";

/// Serializes `value` as a SQL literal for a field declared as `kind`.
///
/// `hint` is the annotation's type token and selects the encoding of
/// temporal values.
pub fn serialize(
    field: &str,
    value: &Value,
    kind: &FieldKind,
    hint: Option<&str>,
    dialect: &dyn Dialect,
) -> Result<String> {
    match kind {
        FieldKind::Optional(inner) => match value {
            Value::Null => Ok(String::from("null")),
            _ => serialize(field, value, inner, hint, dialect),
        },
        FieldKind::Scalar(scalar) => scalar_literal(field, value, *scalar, hint, dialect),
        FieldKind::Record(_) | FieldKind::Sequence | FieldKind::Map | FieldKind::Opaque => {
            Err(Error::UnsupportedValue {
                field: field.to_string(),
                kind: kind.to_string(),
            })
        }
    }
}

fn scalar_literal(
    field: &str,
    value: &Value,
    kind: ScalarKind,
    hint: Option<&str>,
    dialect: &dyn Dialect,
) -> Result<String> {
    match (kind, value) {
        (ScalarKind::Integer, Value::Int(n)) => Ok(n.to_string()),
        (ScalarKind::Unsigned, Value::UInt(n)) => Ok(n.to_string()),
        (ScalarKind::Float, Value::Float(f)) => float_literal(field, *f),
        (ScalarKind::Text, Value::Text(s)) => Ok(text_literal(s)),
        (ScalarKind::Bool, Value::Bool(b)) => Ok(bool_literal(*b)),
        (ScalarKind::Bytes, Value::Bytes(bytes)) => Ok(dialect.binary_literal(bytes)),
        (ScalarKind::Timestamp, Value::Timestamp(t)) => temporal_literal(field, t, hint),
        (expected, found) => Err(Error::ValueKindMismatch {
            field: field.to_string(),
            expected: expected.to_string(),
            found: found.kind_name().to_string(),
        }),
    }
}

/// Serializes an untyped value, as used on the right side of filters.
///
/// Timestamps use the `datetime` text encoding.
pub fn literal(column: &str, value: &Value, dialect: &dyn Dialect) -> Result<String> {
    match value {
        Value::Null => Ok(String::from("null")),
        Value::Int(n) => Ok(n.to_string()),
        Value::UInt(n) => Ok(n.to_string()),
        Value::Float(f) => float_literal(column, *f),
        Value::Text(s) => Ok(text_literal(s)),
        Value::Bool(b) => Ok(bool_literal(*b)),
        Value::Bytes(bytes) => Ok(dialect.binary_literal(bytes)),
        Value::Timestamp(t) => Ok(format!("'{}'", t.format(DATETIME_FORMAT))),
        Value::Record(_) | Value::Sequence(_) | Value::Map(_) => Err(Error::UnsupportedValue {
            field: column.to_string(),
            kind: value.kind_name().to_string(),
        }),
    }
}

fn text_literal(s: &str) -> String {
    // Escape single quotes by doubling them
    format!("'{}'", s.replace('\'', "''"))
}

fn bool_literal(b: bool) -> String {
    String::from(if b { "1" } else { "0" })
}

fn float_literal(field: &str, f: f64) -> Result<String> {
    if f.is_finite() {
        Ok(f.to_string())
    } else {
        Err(Error::UnsupportedValue {
            field: field.to_string(),
            kind: format!("non-finite float ({f})"),
        })
    }
}

fn temporal_literal(field: &str, t: &DateTime<Utc>, hint: Option<&str>) -> Result<String> {
    let Some(hint) = hint else {
        return Err(Error::MissingTemporalHint {
            field: field.to_string(),
        });
    };

    match hint.to_ascii_lowercase().as_str() {
        "integer" => Ok(t.timestamp_millis().to_string()),
        "real" => Ok(julian_day(t).to_string()),
        "text" | "date" | "datetime" => Ok(format!("'{}'", t.format(DATETIME_FORMAT))),
        "timestamp" => Ok(format!("'{}'", t.format(TIME_FORMAT))),
        _ => Err(Error::UnknownTemporalHint {
            field: field.to_string(),
            hint: hint.to_string(),
        }),
    }
}

fn julian_day(t: &DateTime<Utc>) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let nanos = t.timestamp() as f64 * 1e9 + f64::from(t.timestamp_subsec_nanos());
    UNIX_EPOCH_JULIAN_DAY + nanos / NANOS_PER_DAY
}
