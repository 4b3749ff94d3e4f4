//! Error types for the repository storage system.

use thiserror::Error;

/// Errors that can occur during repository storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A unique key is already taken.
    ///
    /// The backend does not say whether the base url or the fingerprint
    /// collided; callers that care have to look both up.
    #[error("Repository conflicts with an existing record: {base_url}")]
    Conflict { base_url: String },

    #[error("No repository holds fingerprint: {fingerprint}")]
    NotFound { fingerprint: String },

    #[error("Repository data is corrupted: {message}")]
    Corrupted {
        message: String,
        #[source]
        source: Option<eyre::Report>,
    },

    #[error("Storage operation failed: {operation}")]
    Backend {
        operation: String,
        #[source]
        source: Option<eyre::Report>,
    },
}

impl StorageError {
    pub fn backend(operation: impl Into<String>, source: impl Into<eyre::Report>) -> Self {
        Self::Backend {
            operation: operation.into(),
            source: Some(source.into()),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StorageError::Conflict { .. })
    }
}

/// Result type alias for repository storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
