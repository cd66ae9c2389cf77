//! Relational join operators (inner, left, right, and full outer) over two
//! ordered collections of dynamic records, plus a projection helper for
//! flattening joined rows into tuples.
//!
//! Records are [`Value`]s and are opaque to the engine: keys are derived only
//! through a resolved [`KeySpec`] (field name, position, or accessor
//! function). Matching is hash-based with a full Cartesian product within
//! each key group, and unmatched rows are null-padded according to the join
//! type.

pub mod errors;
pub mod join;
pub mod json;
pub mod keys;
pub mod project;
pub mod scalar;

pub use errors::{JoinError, Result};
pub use join::{JoinRow, JoinType, inner_join, join, left_join, outer_join, right_join};
pub use keys::{KeyAccessor, KeySpec};
pub use project::{ProjectColumn, Side, project};
pub use scalar::{Value, ValueKind};
