use std::fmt;
use std::sync::Arc;

use crate::errors::{JoinError, Result};
use crate::scalar::Value;

/// Function type for caller-supplied key extractors.
pub type AccessorFn = dyn Fn(&Value) -> Result<Value> + Send + Sync;

/// Describes how to derive a join key from a record.
#[derive(Clone)]
pub enum KeySpec {
    /// Key is the value of the named field. Records missing the field key as
    /// null, and null keys match each other.
    Field(String),
    /// Key is the element at this position. Records must be lists with
    /// sufficient arity.
    Position(usize),
    /// Key is whatever the supplied function returns.
    Accessor(Arc<AccessorFn>),
}

impl KeySpec {
    pub fn field(name: impl Into<String>) -> Self {
        KeySpec::Field(name.into())
    }

    pub const fn position(position: usize) -> Self {
        KeySpec::Position(position)
    }

    pub fn accessor<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        KeySpec::Accessor(Arc::new(f))
    }

    /// Resolve the spec into a uniform accessor.
    ///
    /// Spec validation happens here, before any record is visited. Per-record
    /// failures (wrong record shape, arity too small) surface lazily when the
    /// accessor reaches the offending record.
    ///
    /// The returned accessor owns everything it needs and may outlive the
    /// spec it was resolved from.
    pub fn resolve(&self) -> Result<KeyAccessor> {
        match self {
            KeySpec::Field(name) => {
                if name.is_empty() {
                    return Err(JoinError::InvalidKeySpec(
                        "field name cannot be empty".to_string(),
                    ));
                }
                let name = name.clone();
                Ok(KeyAccessor(Box::new(move |record| {
                    field_key(record, &name)
                })))
            }
            KeySpec::Position(position) => {
                let position = *position;
                Ok(KeyAccessor(Box::new(move |record| {
                    position_key(record, position)
                })))
            }
            KeySpec::Accessor(f) => {
                let f = Arc::clone(f);
                Ok(KeyAccessor(Box::new(move |record| f(record))))
            }
        }
    }
}

impl fmt::Debug for KeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySpec::Field(name) => f.debug_tuple("Field").field(name).finish(),
            KeySpec::Position(position) => f.debug_tuple("Position").field(position).finish(),
            KeySpec::Accessor(_) => f.debug_tuple("Accessor").finish_non_exhaustive(),
        }
    }
}

/// A resolved accessor mapping records to keys.
pub struct KeyAccessor(Box<dyn Fn(&Value) -> Result<Value> + Send + Sync>);

impl KeyAccessor {
    /// Derive the key for a record.
    pub fn key_of(&self, record: &Value) -> Result<Value> {
        (self.0)(record)
    }
}

impl fmt::Debug for KeyAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KeyAccessor").finish_non_exhaustive()
    }
}

/// Resolve a spec pair into left and right accessors.
///
/// A missing right spec reuses the left spec for both sides, for self-joins
/// and symmetric schemas.
pub fn resolve_pair(
    left: &KeySpec,
    right: Option<&KeySpec>,
) -> Result<(KeyAccessor, KeyAccessor)> {
    let left_accessor = left.resolve()?;
    let right_accessor = right.unwrap_or(left).resolve()?;
    Ok((left_accessor, right_accessor))
}

fn field_key(record: &Value, field: &str) -> Result<Value> {
    match record {
        // Missing fields are valid key values: absent-as-null.
        Value::Struct(_) => Ok(record.field(field).cloned().unwrap_or(Value::Null)),
        other => Err(JoinError::FieldAccess {
            field: field.to_string(),
            kind: other.kind(),
        }),
    }
}

fn position_key(record: &Value, position: usize) -> Result<Value> {
    match record {
        Value::List(items) => items
            .get(position)
            .cloned()
            .ok_or(JoinError::PositionOutOfBounds {
                position,
                arity: items.len(),
            }),
        other => Err(JoinError::PositionAccess {
            position,
            kind: other.kind(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_spec_missing_field_is_null() {
        let accessor = KeySpec::field("k").resolve().unwrap();

        let record = Value::record([("k", Value::from(3_i64))]);
        assert_eq!(Value::Int64(3), accessor.key_of(&record).unwrap());

        let record = Value::record([("v", Value::from("a"))]);
        assert_eq!(Value::Null, accessor.key_of(&record).unwrap());
    }

    #[test]
    fn field_spec_on_non_struct() {
        let accessor = KeySpec::field("k").resolve().unwrap();

        let err = accessor.key_of(&Value::from(3_i64)).unwrap_err();
        assert!(matches!(err, JoinError::FieldAccess { .. }), "{err}");
    }

    #[test]
    fn empty_field_name_rejected_at_resolution() {
        let err = KeySpec::field("").resolve().unwrap_err();
        assert!(matches!(err, JoinError::InvalidKeySpec(_)), "{err}");
    }

    #[test]
    fn position_spec_bounds() {
        let accessor = KeySpec::position(1).resolve().unwrap();

        let record = Value::List(vec![Value::from(1_i64), Value::from("a")]);
        assert_eq!(Value::Utf8("a".to_string()), accessor.key_of(&record).unwrap());

        let short = Value::List(vec![Value::from(1_i64)]);
        let err = accessor.key_of(&short).unwrap_err();
        assert!(
            matches!(
                err,
                JoinError::PositionOutOfBounds {
                    position: 1,
                    arity: 1
                }
            ),
            "{err}"
        );

        let err = accessor.key_of(&Value::from("a")).unwrap_err();
        assert!(matches!(err, JoinError::PositionAccess { .. }), "{err}");
    }

    #[test]
    fn accessor_spec_passthrough() {
        let spec = KeySpec::accessor(|record| {
            Ok(record.field("a").cloned().unwrap_or(Value::Null))
        });
        let accessor = spec.resolve().unwrap();

        let record = Value::record([("a", Value::from(9_i64))]);
        assert_eq!(Value::Int64(9), accessor.key_of(&record).unwrap());
    }

    #[test]
    fn resolved_accessor_outlives_its_spec() {
        // Resolving a temporary spec is fine; the accessor owns its data.
        let accessor = KeySpec::field("k").resolve().unwrap();

        let record = Value::record([("k", Value::from(5_i64))]);
        assert_eq!(Value::Int64(5), accessor.key_of(&record).unwrap());
    }

    #[test]
    fn pair_reuses_left_spec() {
        let spec = KeySpec::position(0);
        let (left, right) = resolve_pair(&spec, None).unwrap();

        let record = Value::List(vec![Value::from(7_i64)]);
        assert_eq!(Value::Int64(7), left.key_of(&record).unwrap());
        assert_eq!(Value::Int64(7), right.key_of(&record).unwrap());
    }
}
