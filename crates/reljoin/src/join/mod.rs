mod index;

pub use index::JoinIndex;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::Result;
use crate::keys::{KeySpec, resolve_pair};
use crate::scalar::Value;

/// Join kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinType {
    /// Standard INNER join.
    Inner,
    /// Standard LEFT join.
    Left,
    /// Standard RIGHT join.
    Right,
    /// Standard full/outer join.
    Full,
}

impl JoinType {
    /// If unmatched left-side records are emitted with a null right side.
    pub const fn keeps_unmatched_left(&self) -> bool {
        matches!(self, JoinType::Left | JoinType::Full)
    }

    /// If unmatched right-side records are emitted with a null left side.
    pub const fn keeps_unmatched_right(&self) -> bool {
        matches!(self, JoinType::Right | JoinType::Full)
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER"),
            JoinType::Left => write!(f, "LEFT"),
            JoinType::Right => write!(f, "RIGHT"),
            JoinType::Full => write!(f, "FULL"),
        }
    }
}

/// One output row of a join.
///
/// `None` on a side means the other side's record had no join partner. Rows
/// borrow from the caller's input slices; nothing is copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JoinRow<'a> {
    pub left: Option<&'a Value>,
    pub right: Option<&'a Value>,
}

impl<'a> JoinRow<'a> {
    pub const fn matched(left: &'a Value, right: &'a Value) -> Self {
        JoinRow {
            left: Some(left),
            right: Some(right),
        }
    }

    pub const fn left_only(left: &'a Value) -> Self {
        JoinRow {
            left: Some(left),
            right: None,
        }
    }

    pub const fn right_only(right: &'a Value) -> Self {
        JoinRow {
            left: None,
            right: Some(right),
        }
    }

    /// If both sides are populated.
    pub const fn is_matched(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    /// Same row with sides flipped.
    pub const fn swapped(&self) -> JoinRow<'a> {
        JoinRow {
            left: self.right,
            right: self.left,
        }
    }
}

/// Join two record collections according to the join type.
///
/// `right_key: None` reuses `left_key` for both sides.
pub fn join<'a>(
    join_type: JoinType,
    left: &'a [Value],
    right: &'a [Value],
    left_key: &KeySpec,
    right_key: Option<&KeySpec>,
) -> Result<Vec<JoinRow<'a>>> {
    match join_type {
        JoinType::Inner => inner_join(left, right, left_key, right_key),
        JoinType::Left => left_join(left, right, left_key, right_key),
        JoinType::Right => right_join(left, right, left_key, right_key),
        JoinType::Full => outer_join(left, right, left_key, right_key),
    }
}

/// Emit only genuine matches: for every key present on both sides, the
/// Cartesian product of the two row groups.
///
/// Output is ordered by the left side's first-occurrence key order, with all
/// rows for a key adjacent. Within a key group the left group is the outer
/// loop, the right group the inner loop.
pub fn inner_join<'a>(
    left: &'a [Value],
    right: &'a [Value],
    left_key: &KeySpec,
    right_key: Option<&KeySpec>,
) -> Result<Vec<JoinRow<'a>>> {
    let (left_accessor, right_accessor) = resolve_pair(left_key, right_key)?;
    let left_index = JoinIndex::build(left, &left_accessor)?;
    let right_index = JoinIndex::build(right, &right_accessor)?;

    debug!(
        left_rows = left.len(),
        right_rows = right.len(),
        left_keys = left_index.num_keys(),
        right_keys = right_index.num_keys(),
        "executing inner join"
    );

    let mut rows = Vec::new();
    for (key, left_rows) in left_index.iter() {
        if let Some(right_rows) = right_index.get(key) {
            for &left_row in left_rows {
                for &right_row in right_rows {
                    rows.push(JoinRow::matched(&left[left_row], &right[right_row]));
                }
            }
        }
    }

    Ok(rows)
}

/// Emit every left record at least once, in left-input order.
///
/// Records whose key exists on the right produce one row per matching right
/// record; the rest produce exactly one `(record, null)` row.
pub fn left_join<'a>(
    left: &'a [Value],
    right: &'a [Value],
    left_key: &KeySpec,
    right_key: Option<&KeySpec>,
) -> Result<Vec<JoinRow<'a>>> {
    let (left_accessor, right_accessor) = resolve_pair(left_key, right_key)?;
    let right_index = JoinIndex::build(right, &right_accessor)?;

    debug!(
        left_rows = left.len(),
        right_rows = right.len(),
        right_keys = right_index.num_keys(),
        "executing left join"
    );

    let mut rows = Vec::with_capacity(left.len());
    for record in left {
        let key = index::checked_key(record, &left_accessor)?;
        match right_index.get(&key) {
            Some(right_rows) => {
                for &right_row in right_rows {
                    rows.push(JoinRow::matched(record, &right[right_row]));
                }
            }
            None => rows.push(JoinRow::left_only(record)),
        }
    }

    Ok(rows)
}

/// Mirror of `left_join` with the sides swapped: every right record is
/// represented at least once, in right-input order, unmatched ones paired
/// with a null left side.
pub fn right_join<'a>(
    left: &'a [Value],
    right: &'a [Value],
    left_key: &KeySpec,
    right_key: Option<&KeySpec>,
) -> Result<Vec<JoinRow<'a>>> {
    let (left_accessor, right_accessor) = resolve_pair(left_key, right_key)?;
    let left_index = JoinIndex::build(left, &left_accessor)?;

    debug!(
        left_rows = left.len(),
        right_rows = right.len(),
        left_keys = left_index.num_keys(),
        "executing right join"
    );

    let mut rows = Vec::with_capacity(right.len());
    for record in right {
        let key = index::checked_key(record, &right_accessor)?;
        match left_index.get(&key) {
            Some(left_rows) => {
                for &left_row in left_rows {
                    rows.push(JoinRow::matched(&left[left_row], record));
                }
            }
            None => rows.push(JoinRow::right_only(record)),
        }
    }

    Ok(rows)
}

/// Union of left and right join results with genuine matches counted once.
///
/// Built directly from the key-set partition rather than by deduplicating
/// concatenated left/right results: matched keys emit the Cartesian product,
/// left-only keys emit `(record, null)`, right-only keys emit
/// `(null, record)`. Null-padded rows can only come from one traversal each,
/// so no row is ever produced twice.
pub fn outer_join<'a>(
    left: &'a [Value],
    right: &'a [Value],
    left_key: &KeySpec,
    right_key: Option<&KeySpec>,
) -> Result<Vec<JoinRow<'a>>> {
    let (left_accessor, right_accessor) = resolve_pair(left_key, right_key)?;
    let left_index = JoinIndex::build(left, &left_accessor)?;
    let right_index = JoinIndex::build(right, &right_accessor)?;

    debug!(
        left_rows = left.len(),
        right_rows = right.len(),
        left_keys = left_index.num_keys(),
        right_keys = right_index.num_keys(),
        "executing full join"
    );

    let mut rows = Vec::new();

    // Matched and left-only keys, in left first-occurrence order.
    for (key, left_rows) in left_index.iter() {
        match right_index.get(key) {
            Some(right_rows) => {
                for &left_row in left_rows {
                    for &right_row in right_rows {
                        rows.push(JoinRow::matched(&left[left_row], &right[right_row]));
                    }
                }
            }
            None => {
                for &left_row in left_rows {
                    rows.push(JoinRow::left_only(&left[left_row]));
                }
            }
        }
    }

    // Right-only keys, in right first-occurrence order.
    for (key, right_rows) in right_index.iter() {
        if !left_index.contains_key(key) {
            for &right_row in right_rows {
                rows.push(JoinRow::right_only(&right[right_row]));
            }
        }
    }

    Ok(rows)
}
