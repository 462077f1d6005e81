use thiserror::Error;

use crate::value::Value;

/// Errors produced by value and node operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// A JSON `null` has no counterpart in the value model.
    #[error("null value for key {key:?}")]
    NullValue { key: String },

    /// A JSON array mixes element types that share no array variant.
    #[error("mixed element types in array for key {key:?}")]
    MixedArray { key: String },

    /// A JSON array contains arrays; only flat arrays are representable.
    #[error("nested array for key {key:?}: only one-dimensional arrays are supported")]
    NestedArray { key: String },

    /// The top-level JSON document is not an object.
    #[error("expected a JSON object, got {0}")]
    NotAnObject(String),

    /// Sibling arrays that must share a length differ.
    #[error("length mismatch: {first:?} has {first_len} elements, {second:?} has {second_len}")]
    ComponentLengthMismatch {
        first: String,
        first_len: usize,
        second: String,
        second_len: usize,
    },

    /// Growing a node array could not reserve memory.
    #[error("allocation failure while reserving {requested} nodes")]
    AllocationFailure { requested: usize },
}

/// Convenience alias for type results.
pub type TypeResult<T> = Result<T, TypeError>;

/// Check that two array-valued attributes have the same number of elements.
///
/// The merge engine stores raw arrays untouched; consumers that pair
/// components (`x` with `y`, for instance) call this before using them.
pub fn check_equal_lengths(
    first: (&str, &Value),
    second: (&str, &Value),
) -> TypeResult<usize> {
    let first_len = first.1.len().unwrap_or(1);
    let second_len = second.1.len().unwrap_or(1);
    if first_len != second_len {
        return Err(TypeError::ComponentLengthMismatch {
            first: first.0.to_string(),
            first_len,
            second: second.0.to_string(),
            second_len,
        });
    }
    Ok(first_len)
}
