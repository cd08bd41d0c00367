//! Runtime field values and the mapping from Rust types to field kinds.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::record::{FieldKind, ScalarKind};

/// A field value captured from a record instance.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent optional value.
    Null,
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point number.
    Float(f64),
    /// Text.
    Text(String),
    /// Boolean.
    Bool(bool),
    /// Fixed-size byte array.
    Bytes(Vec<u8>),
    /// Point in time.
    Timestamp(DateTime<Utc>),
    /// Values of a nested record, in field order.
    Record(Vec<Value>),
    /// Sequence elements.
    Sequence(Vec<Value>),
    /// Map entries.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Returns a short name for the value's kind, used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int(_) => "integer",
            Self::UInt(_) => "unsigned integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Bool(_) => "boolean",
            Self::Bytes(_) => "bytes",
            Self::Timestamp(_) => "timestamp",
            Self::Record(_) => "record",
            Self::Sequence(_) => "sequence",
            Self::Map(_) => "map",
        }
    }
}

/// Trait for Rust types that can be record fields.
///
/// `#[derive(Record)]` implements it for the record itself so records can be
/// nested.
pub trait FieldType {
    /// Returns the declared kind of fields of this type.
    fn kind() -> FieldKind;

    /// Captures the value.
    fn to_value(&self) -> Value;
}

macro_rules! scalar_field_type {
    ($kind:ident, $variant:ident, $via:ty => $($ty:ty),+) => {
        $(
            impl FieldType for $ty {
                fn kind() -> FieldKind {
                    FieldKind::Scalar(ScalarKind::$kind)
                }

                fn to_value(&self) -> Value {
                    Value::$variant(<$via>::from(*self))
                }
            }
        )+
    };
}

scalar_field_type!(Integer, Int, i64 => i8, i16, i32, i64);
scalar_field_type!(Unsigned, UInt, u64 => u8, u16, u32, u64);
scalar_field_type!(Float, Float, f64 => f64);
scalar_field_type!(Bool, Bool, bool => bool);

impl FieldType for f32 {
    fn kind() -> FieldKind {
        FieldKind::Scalar(ScalarKind::Float)
    }

    fn to_value(&self) -> Value {
        // keep the shortest 32-bit decimal, `0.1` rather than `0.10000000149011612`
        let widened = self.to_string().parse::<f64>().unwrap_or_else(|_| f64::from(*self));
        Value::Float(widened)
    }
}

impl FieldType for isize {
    fn kind() -> FieldKind {
        FieldKind::Scalar(ScalarKind::Integer)
    }

    fn to_value(&self) -> Value {
        // isize is at most 64 bits on every supported target
        Value::Int(*self as i64)
    }
}

impl FieldType for usize {
    fn kind() -> FieldKind {
        FieldKind::Scalar(ScalarKind::Unsigned)
    }

    fn to_value(&self) -> Value {
        Value::UInt(*self as u64)
    }
}

impl FieldType for String {
    fn kind() -> FieldKind {
        FieldKind::Scalar(ScalarKind::Text)
    }

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl FieldType for str {
    fn kind() -> FieldKind {
        FieldKind::Scalar(ScalarKind::Text)
    }

    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl<const N: usize> FieldType for [u8; N] {
    fn kind() -> FieldKind {
        FieldKind::Scalar(ScalarKind::Bytes)
    }

    fn to_value(&self) -> Value {
        Value::Bytes(self.to_vec())
    }
}

impl FieldType for DateTime<Utc> {
    fn kind() -> FieldKind {
        FieldKind::Scalar(ScalarKind::Timestamp)
    }

    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }
}

impl FieldType for NaiveDateTime {
    fn kind() -> FieldKind {
        FieldKind::Scalar(ScalarKind::Timestamp)
    }

    fn to_value(&self) -> Value {
        Value::Timestamp(self.and_utc())
    }
}

impl<T: FieldType> FieldType for Option<T> {
    fn kind() -> FieldKind {
        FieldKind::Optional(Box::new(T::kind()))
    }

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, FieldType::to_value)
    }
}

impl<T: FieldType + ?Sized> FieldType for Box<T> {
    fn kind() -> FieldKind {
        T::kind()
    }

    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: FieldType + ?Sized> FieldType for &T {
    fn kind() -> FieldKind {
        T::kind()
    }

    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: FieldType> FieldType for Vec<T> {
    fn kind() -> FieldKind {
        FieldKind::Sequence
    }

    fn to_value(&self) -> Value {
        Value::Sequence(self.iter().map(FieldType::to_value).collect())
    }
}

impl<K: FieldType, V: FieldType, S> FieldType for HashMap<K, V, S> {
    fn kind() -> FieldKind {
        FieldKind::Map
    }

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_value(), v.to_value()))
                .collect(),
        )
    }
}

impl<K: FieldType, V: FieldType> FieldType for BTreeMap<K, V> {
    fn kind() -> FieldKind {
        FieldKind::Map
    }

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_value(), v.to_value()))
                .collect(),
        )
    }
}
