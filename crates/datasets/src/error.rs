use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset not found: {name}")]
    NotFound { name: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("network error: {message}")]
    Network { message: String },

    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// Any failure while fetching or normalizing a dataset, as seen by callers
    /// of [`crate::fetch_dataset`].
    #[error("{message}")]
    Read { message: String },
}

impl DatasetError {
    pub fn read(cause: impl std::fmt::Display) -> Self {
        DatasetError::Read {
            message: format!("Error fetching dataset: {cause}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, DatasetError>;
