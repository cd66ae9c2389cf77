use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::join::JoinRow;
use crate::keys::KeySpec;
use crate::scalar::Value;

/// Which side of a join row a projected column reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// A single output column: a side and a key spec applied to that side's
/// record.
#[derive(Debug, Clone)]
pub struct ProjectColumn {
    pub side: Side,
    pub key: KeySpec,
}

impl ProjectColumn {
    pub fn left(key: KeySpec) -> Self {
        ProjectColumn {
            side: Side::Left,
            key,
        }
    }

    pub fn right(key: KeySpec) -> Self {
        ProjectColumn {
            side: Side::Right,
            key,
        }
    }
}

/// Flatten join rows into tuples according to the column list.
///
/// A column addressing a null side yields `Value::Null` for that row. Output
/// column order matches specifier order. All column specs are resolved before
/// any row is touched.
pub fn project(rows: &[JoinRow<'_>], columns: &[ProjectColumn]) -> Result<Vec<Vec<Value>>> {
    let accessors = columns
        .iter()
        .map(|column| column.key.resolve())
        .collect::<Result<Vec<_>>>()?;

    let mut output = Vec::with_capacity(rows.len());
    for row in rows {
        let mut tuple = Vec::with_capacity(columns.len());
        for (column, accessor) in columns.iter().zip(&accessors) {
            let record = match column.side {
                Side::Left => row.left,
                Side::Right => row.right,
            };
            let value = match record {
                Some(record) => accessor.key_of(record)?,
                None => Value::Null,
            };
            tuple.push(value);
        }
        output.push(tuple);
    }

    Ok(output)
}
