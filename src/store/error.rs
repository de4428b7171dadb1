use thiserror::Error;

use crate::record::Record;

/// Error type for record store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The target record does not exist.
    #[error("{resource} {id} was not found")]
    NotFound { resource: String, id: String },

    /// The write collides with existing data (e.g. a duplicate email).
    #[error("{message}")]
    Conflict { resource: String, message: String },

    /// Timeout or connectivity failure. Safe to retry.
    #[error("network error: {0}")]
    Transient(String),

    /// Any other non-success response from the backend.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Serialization/deserialization error.
    #[error("record serialization error: {0}")]
    Serde(String),

    /// Storage-level error (filesystem, poisoned lock).
    #[error("record storage error: {0}")]
    Storage(String),
}

impl StoreError {
    pub fn not_found<R: Record>(id: &str) -> Self {
        StoreError::NotFound {
            resource: R::RESOURCE.to_string(),
            id: id.to_string(),
        }
    }

    pub fn conflict<R: Record>(message: impl Into<String>) -> Self {
        StoreError::Conflict {
            resource: R::RESOURCE.to_string(),
            message: message.into(),
        }
    }

    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Transient(_))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Storage(err.to_string())
    }
}
