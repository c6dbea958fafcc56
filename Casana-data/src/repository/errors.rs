use std::sync::PoisonError;
use thiserror::Error;

/// Error type for repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Transport-level failure talking to the vendor API
    #[error("Vendor API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Vendor API answered with a non-success status
    #[error("Vendor API returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Payload did not match the expected shape
    #[error("Invalid vendor payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// Requested resource does not exist upstream
    #[error("Not found: {0}")]
    NotFound(String),

    /// Repository could not be built from the supplied settings
    #[error("Invalid repository configuration: {0}")]
    Configuration(String),

    /// Lock error
    #[error("Lock error: {0}")]
    Lock(String),
}

impl<T> From<PoisonError<T>> for RepositoryError {
    fn from(error: PoisonError<T>) -> Self {
        RepositoryError::Lock(error.to_string())
    }
}
