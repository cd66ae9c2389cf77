use ahash::RandomState;
use indexmap::IndexMap;
use tracing::trace;

use crate::errors::{JoinError, Result};
use crate::keys::KeyAccessor;
use crate::scalar::Value;

/// State used for hashing index keys.
///
/// Fixed seeds so key iteration order is reproducible across runs.
pub(crate) const INDEX_RANDOM_STATE: RandomState = RandomState::with_seeds(0, 0, 0, 0);

/// Key -> multiset-of-rows mapping for one input side.
///
/// Groups hold indices into the side's record slice, in input order. Keys
/// iterate in first-seen order. Built once per side per join call and
/// discarded on return.
#[derive(Debug)]
pub struct JoinIndex {
    groups: IndexMap<Value, Vec<usize>, RandomState>,
}

impl JoinIndex {
    pub fn build(records: &[Value], accessor: &KeyAccessor) -> Result<Self> {
        let mut groups = IndexMap::with_capacity_and_hasher(records.len(), INDEX_RANDOM_STATE);
        for (row_idx, record) in records.iter().enumerate() {
            let key = checked_key(record, accessor)?;
            groups.entry(key).or_insert_with(Vec::new).push(row_idx);
        }

        trace!(rows = records.len(), keys = groups.len(), "built join index");

        Ok(JoinIndex { groups })
    }

    /// Get the row group for a key.
    pub fn get(&self, key: &Value) -> Option<&[usize]> {
        self.groups.get(key).map(|rows| rows.as_slice())
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.groups.contains_key(key)
    }

    /// Iterate key groups in first-seen key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &[usize])> {
        self.groups.iter().map(|(key, rows)| (key, rows.as_slice()))
    }

    pub fn num_keys(&self) -> usize {
        self.groups.len()
    }
}

/// Derive the join key for a record, rejecting keys without stable equality.
pub(crate) fn checked_key(record: &Value, accessor: &KeyAccessor) -> Result<Value> {
    let key = accessor.key_of(record)?;
    if key.contains_nan() {
        return Err(JoinError::UnstableKey {
            key: key.to_string(),
        });
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeySpec;

    #[test]
    fn duplicate_keys_group_in_input_order() {
        let records = vec![
            Value::List(vec![Value::from(1_i64), Value::from("a")]),
            Value::List(vec![Value::from(2_i64), Value::from("b")]),
            Value::List(vec![Value::from(1_i64), Value::from("c")]),
        ];
        let accessor = KeySpec::position(0).resolve().unwrap();

        let index = JoinIndex::build(&records, &accessor).unwrap();

        assert_eq!(2, index.num_keys());
        assert_eq!(Some(&[0, 2][..]), index.get(&Value::Int64(1)));
        assert_eq!(Some(&[1][..]), index.get(&Value::Int64(2)));
        assert_eq!(None, index.get(&Value::Int64(3)));
    }

    #[test]
    fn keys_iterate_in_first_seen_order() {
        let records = vec![
            Value::record([("k", Value::from(9_i64))]),
            Value::record([("k", Value::from(4_i64))]),
            Value::record([("k", Value::from(9_i64))]),
            Value::record([("k", Value::from(1_i64))]),
        ];
        let accessor = KeySpec::field("k").resolve().unwrap();

        let index = JoinIndex::build(&records, &accessor).unwrap();

        let keys: Vec<_> = index.iter().map(|(key, _)| key.clone()).collect();
        assert_eq!(
            vec![Value::Int64(9), Value::Int64(4), Value::Int64(1)],
            keys
        );
    }

    #[test]
    fn nan_key_rejected_during_build() {
        let records = vec![Value::record([("k", Value::from(f64::NAN))])];
        let accessor = KeySpec::field("k").resolve().unwrap();

        let err = JoinIndex::build(&records, &accessor).unwrap_err();
        assert!(matches!(err, JoinError::UnstableKey { .. }), "{err}");
    }
}
