use std::path::PathBuf;

use datasets::DatasetError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// Bad input from the annotator (unknown column, row out of range, ...).
    #[error("{0}")]
    Value(String),

    #[error("failed to encode annotations: {0}")]
    Encode(String),

    #[error("failed to write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
}

impl AnnotationError {
    pub fn value(message: impl Into<String>) -> Self {
        AnnotationError::Value(message.into())
    }
}

pub type Result<T> = std::result::Result<T, AnnotationError>;
