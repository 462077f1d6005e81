//! Error types for the schema crate.

use ptree_types::Level;

/// Errors produced by schema construction and lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The key is not assigned to any level.
    #[error("unknown key {0:?}: not assigned to any hierarchy level")]
    UnknownKey(String),

    /// The key was listed for two levels.
    #[error("key {key:?} is assigned to both {first} and {second}")]
    DuplicateKey {
        key: String,
        first: Level,
        second: Level,
    },
}

/// Convenience alias for schema results.
pub type SchemaResult<T> = Result<T, SchemaError>;
