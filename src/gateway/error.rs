use thiserror::Error;

use crate::notify::MutationKind;
use crate::store::StoreError;
use crate::validate::ValidationErrors;

/// Error type for mutation gateway operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    /// Local field validation failed; nothing was sent to the store.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// The store rejected or failed the request.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Another mutation for the same record has not resolved yet.
    #[error("{resource} {id} already has a pending {kind:?}")]
    InFlight {
        resource: String,
        id: String,
        kind: MutationKind,
    },
}

impl From<ValidationErrors> for MutationError {
    fn from(errors: ValidationErrors) -> Self {
        MutationError::Validation(errors)
    }
}

impl MutationError {
    /// The single message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            MutationError::Validation(_) => "Please correct the highlighted fields".to_string(),
            MutationError::Store(StoreError::NotFound { .. }) => {
                "This record no longer exists".to_string()
            }
            MutationError::Store(StoreError::Conflict { message, .. }) => message.clone(),
            MutationError::Store(StoreError::Transient(_)) => {
                "Could not reach the server, please try again".to_string()
            }
            MutationError::Store(StoreError::Server { message, .. }) => message.clone(),
            MutationError::Store(err) => err.to_string(),
            MutationError::InFlight { .. } => {
                "Please wait for the previous change to finish".to_string()
            }
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            MutationError::Store(err) => err.is_retryable(),
            MutationError::InFlight { .. } => true,
            MutationError::Validation(_) => false,
        }
    }

    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            MutationError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
