use thiserror::Error;

use carcheck_core::checklist::ChecklistError;
use carcheck_core::storage::{repository_error_message, RepositoryError};

/// Errors returned by [`crate::ChecklistService`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Validation(#[from] ChecklistError),
}

impl ServiceError {
    /// Message suitable for showing to the person filling in the checklist.
    pub fn user_message(&self) -> String {
        match self {
            Self::Repository(err) => repository_error_message(err),
            Self::Validation(err) => err.to_string(),
        }
    }

    /// Returns true if the error is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(err) if err.is_not_found())
    }
}

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
