use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("merge error: {0}")]
    Merge(#[from] ptree_merge::MergeError),

    #[error("value error: {0}")]
    Value(#[from] ptree_types::TypeError),

    #[error("schema error: {0}")]
    Schema(#[from] ptree_schema::SchemaError),
}

pub type SdkResult<T> = Result<T, SdkError>;
