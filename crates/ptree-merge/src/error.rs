use thiserror::Error;

use ptree_schema::SchemaError;
use ptree_types::{TypeError, ValueKind};

/// Errors that abort a merge call.
///
/// Unknown keys are not errors; they are reported as
/// [`MergeWarning`](crate::MergeWarning)s and the merge continues. Mutations
/// applied before an error are not rolled back.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MergeError {
    /// A structural key carried something other than a node or a flat node array.
    #[error("structural key {key:?} holds a {found}; only a node or a one-dimensional node array can be merged")]
    StructuralDimensionUnsupported { key: String, found: ValueKind },

    /// Growing a node array could not reserve memory.
    #[error("allocation failure while reserving {requested} nodes")]
    AllocationFailure { requested: usize },

    /// The tree lost structure that earlier steps guarantee exists.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("value error: {0}")]
    Value(TypeError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<TypeError> for MergeError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::AllocationFailure { requested } => Self::AllocationFailure { requested },
            other => Self::Value(other),
        }
    }
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
