//! Conversions between `serde_json::Value` and [`Value`] so parsed JSON
//! documents can be joined directly.

use crate::scalar::Value;

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(v) => Value::Boolean(v),
            serde_json::Value::Number(v) => match v.as_i64() {
                Some(v) => Value::Int64(v),
                None => v.as_f64().map(Value::Float64).unwrap_or(Value::Null),
            },
            serde_json::Value::String(v) => Value::Utf8(v),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Struct(
                fields
                    .into_iter()
                    .map(|(name, value)| (name, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(v) => serde_json::Value::Bool(v),
            Value::Int64(v) => serde_json::Value::Number(v.into()),
            // JSON can't represent non-finite floats.
            Value::Float64(v) => serde_json::Number::from_f64(v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Utf8(v) => serde_json::Value::String(v),
            Value::List(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Struct(fields) => serde_json::Value::Object(
                fields
                    .into_iter()
                    .map(|(name, value)| (name, serde_json::Value::from(value)))
                    .collect(),
            ),
        }
    }
}
