//! Pure functions for turning repository errors into text a user can read.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to a short message suitable for display.
///
/// Details such as SQL text stay in the logs; the message only says what
/// went wrong from the user's point of view.
///
/// # Examples
///
/// ```
/// use carcheck_core::storage::{repository_error_message, RepositoryError};
///
/// let error = RepositoryError::checklist_not_found(3);
/// assert_eq!(repository_error_message(&error), "Checklist not found");
/// ```
pub fn repository_error_message(error: &RepositoryError) -> String {
    match error {
        RepositoryError::NotFound { entity_type, .. } => match *entity_type {
            "Checklist" => "Checklist not found".to_string(),
            "ChecklistItem" => "Checklist item not found".to_string(),
            other => format!("{other} not found"),
        },
        RepositoryError::AlreadyExists { .. } => "That record already exists".to_string(),
        RepositoryError::ConnectionFailed(_) => "The checklist database is unavailable".to_string(),
        RepositoryError::InvalidData(_) => "The change refers to a checklist that no longer exists".to_string(),
        RepositoryError::QueryFailed(_) | RepositoryError::Serialization(_) => {
            "Failed to save changes".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages() {
        assert_eq!(
            repository_error_message(&RepositoryError::item_not_found(1)),
            "Checklist item not found"
        );
        assert_eq!(
            repository_error_message(&RepositoryError::NotFound {
                entity_type: "Photo",
                id: "1".to_string()
            }),
            "Photo not found"
        );
    }

    #[test]
    fn test_connection_failed_message() {
        let error = RepositoryError::ConnectionFailed("Cannot open database".to_string());
        assert_eq!(
            repository_error_message(&error),
            "The checklist database is unavailable"
        );
    }

    #[test]
    fn test_query_failed_hides_details() {
        let error = RepositoryError::QueryFailed("near \"SELEC\": syntax error".to_string());
        let message = repository_error_message(&error);
        assert_eq!(message, "Failed to save changes");
        assert!(!message.contains("SELEC"));
    }
}
