use crate::scalar::ValueKind;

#[derive(Debug, thiserror::Error)]
pub enum JoinError {
    /// Malformed or unsupported key spec. Detected at resolution time, before
    /// any record is visited.
    #[error("invalid key spec: {0}")]
    InvalidKeySpec(String),

    /// Field spec applied to a record that isn't a struct.
    #[error("cannot read field '{field}' from a record of kind '{kind}'")]
    FieldAccess { field: String, kind: ValueKind },

    /// Position spec applied to a record that isn't a list.
    #[error("cannot read position {position} from a record of kind '{kind}'")]
    PositionAccess { position: usize, kind: ValueKind },

    /// Record arity too small for the requested position.
    #[error("position {position} out of bounds for record with {arity} elements")]
    PositionOutOfBounds { position: usize, arity: usize },

    /// Keys must have stable equality; floats containing NaN do not.
    #[error("join key {key} lacks well-defined equality")]
    UnstableKey { key: String },

    /// A caller-supplied accessor function failed.
    #[error("key accessor failed: {0}")]
    AccessorFailed(String),
}

pub type Result<T, E = JoinError> = std::result::Result<T, E>;
