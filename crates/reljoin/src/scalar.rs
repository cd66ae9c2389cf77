use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A single dynamic value.
///
/// Values double as records: a `Struct` is a keyed record, a `List` is a
/// fixed-arity positional record, and any other variant is an opaque record
/// that can only be keyed through an accessor function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// Null. As a join key, null matches other nulls.
    Null,
    /// True or false value.
    Boolean(bool),
    /// Signed 64bit int.
    Int64(i64),
    /// 64bit float.
    ///
    /// Equality and hashing are bitwise (`to_bits`), so `-0.0 != 0.0` and two
    /// NaNs with the same payload compare equal. NaN-bearing values are
    /// rejected as join keys, see `JoinError::UnstableKey`.
    Float64(f64),
    /// Utf-8 encoded string.
    Utf8(String),
    /// Fixed-arity sequence of values.
    List(Vec<Value>),
    /// Ordered collection of named fields.
    Struct(Vec<(String, Value)>),
}

impl Value {
    /// Build a struct record from name/value pairs.
    pub fn record<S, I>(fields: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Value)>,
    {
        Value::Struct(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Int64(_) => ValueKind::Int64,
            Value::Float64(_) => ValueKind::Float64,
            Value::Utf8(_) => ValueKind::Utf8,
            Value::List(_) => ValueKind::List,
            Value::Struct(_) => ValueKind::Struct,
        }
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the value of the named field, or None if this isn't a struct or
    /// the field doesn't exist.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(fields) => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// If this value contains a NaN float anywhere, making its equality
    /// unsuitable for key grouping.
    pub(crate) fn contains_nan(&self) -> bool {
        match self {
            Value::Float64(v) => v.is_nan(),
            Value::List(items) => items.iter().any(Value::contains_nan),
            Value::Struct(fields) => fields.iter().any(|(_, value)| value.contains_nan()),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Int64(a), Self::Int64(b)) => a == b,
            (Self::Float64(a), Self::Float64(b)) => a.to_bits() == b.to_bits(),
            (Self::Utf8(a), Self::Utf8(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Struct(a), Self::Struct(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => state.write_u8(0),
            Value::Boolean(v) => {
                state.write_u8(1);
                v.hash(state);
            }
            Value::Int64(v) => {
                state.write_u8(2);
                v.hash(state);
            }
            Value::Float64(v) => {
                state.write_u8(3);
                v.to_bits().hash(state);
            }
            Value::Utf8(v) => {
                state.write_u8(4);
                v.hash(state);
            }
            Value::List(items) => {
                state.write_u8(5);
                items.hash(state);
            }
            Value::Struct(fields) => {
                state.write_u8(6);
                fields.hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Utf8(v) => write!(f, "'{v}'"),
            Value::List(items) => {
                write!(f, "[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Struct(fields) => {
                write!(f, "{{")?;
                for (idx, (name, value)) in fields.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int64(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float64(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Utf8(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Utf8(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

/// Kind of a value, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    Null,
    Boolean,
    Int64,
    Float64,
    Utf8,
    List,
    Struct,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Null => write!(f, "Null"),
            ValueKind::Boolean => write!(f, "Boolean"),
            ValueKind::Int64 => write!(f, "Int64"),
            ValueKind::Float64 => write!(f, "Float64"),
            ValueKind::Utf8 => write!(f, "Utf8"),
            ValueKind::List => write!(f, "List"),
            ValueKind::Struct => write!(f, "Struct"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_equality_is_bitwise() {
        assert_eq!(Value::from(1.5), Value::from(1.5));
        assert_ne!(Value::from(0.0), Value::from(-0.0));
        assert_eq!(Value::from(f64::NAN), Value::from(f64::NAN));
    }

    #[test]
    fn struct_field_lookup() {
        let record = Value::record([("k", Value::from(1_i64)), ("v", Value::from("one"))]);

        assert_eq!(Some(&Value::Int64(1)), record.field("k"));
        assert_eq!(Some(&Value::Utf8("one".to_string())), record.field("v"));
        assert_eq!(None, record.field("missing"));
        assert_eq!(None, Value::from(4_i64).field("k"));
    }

    #[test]
    fn nested_nan_detected() {
        let key = Value::List(vec![Value::from(1_i64), Value::from(f64::NAN)]);
        assert!(key.contains_nan());

        let key = Value::record([("a", Value::from(1.5))]);
        assert!(!key.contains_nan());
    }

    #[test]
    fn display_composite() {
        let record = Value::record([
            ("k", Value::from(2_i64)),
            ("tags", Value::List(vec![Value::from("a"), Value::Null])),
        ]);
        assert_eq!("{k: 2, tags: ['a', NULL]}", record.to_string());
    }
}
