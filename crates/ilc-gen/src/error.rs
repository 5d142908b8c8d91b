//! Error type for assembly emission.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("routine '{0}' has no registered signature")]
    UnknownRoutine(String),

    #[error("type '{0}' has no registered descriptor")]
    UnknownType(String),

    #[error("unsupported type on a lowering path: {0}")]
    UnsupportedType(String),

    #[error("record type '{0}' referenced before its declaration")]
    UnknownRecord(String),
}

pub type Result<T> = std::result::Result<T, CodegenError>;
