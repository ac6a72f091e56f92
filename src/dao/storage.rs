use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by live-score backends regardless of the underlying service.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or answered with a server failure.
    #[error("storage unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The backend is reachable but refused this particular request.
    #[error("storage rejected request (status {status}): {message}")]
    Rejected { status: u16, message: String },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Whether the failure says something about connectivity rather than the request.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, StorageError::Unavailable { .. })
    }
}
