//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `RepositoryError`
//! from `carcheck_core::storage`, using the extended result code where the
//! failure has a meaning callers care about.

use carcheck_core::storage::RepositoryError;

/// Maps a rusqlite error to a RepositoryError.
///
/// # Error Mapping
///
/// - `SQLITE_CONSTRAINT_UNIQUE` / `SQLITE_CONSTRAINT_PRIMARYKEY` → `AlreadyExists`
/// - `SQLITE_CONSTRAINT_FOREIGNKEY` → `InvalidData`
/// - `CannotOpen` → `ConnectionFailed`
/// - `QueryReturnedNoRows` → `NotFound`
/// - Column decode failures → `Serialization`
/// - All other errors → `QueryFailed`
fn map_rusqlite_error(
    err: &rusqlite::Error,
    entity_type: &'static str,
    id: Option<i64>,
) -> RepositoryError {
    let id_str = || id.map_or_else(|| "unknown".to_string(), |id| id.to_string());

    match err {
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            RepositoryError::AlreadyExists {
                entity_type,
                id: id_str(),
            }
        }

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
        {
            RepositoryError::InvalidData(format!(
                "Foreign key constraint violation for {entity_type}"
            ))
        }

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::CannotOpen =>
        {
            RepositoryError::ConnectionFailed(format!("Cannot open database: {err}"))
        }

        rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
            entity_type,
            id: id_str(),
        },

        rusqlite::Error::FromSqlConversionFailure(..) | rusqlite::Error::InvalidColumnType(..) => {
            RepositoryError::Serialization(format!("Cannot decode {entity_type} row: {err}"))
        }

        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

/// Maps the error of a `Connection::call` to a RepositoryError.
///
/// Pass the entity ID when the call site knows it so `NotFound` and
/// `AlreadyExists` carry it.
pub fn map_call_error(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
    id: Option<i64>,
) -> RepositoryError {
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => {
            map_rusqlite_error(rusqlite_err, entity_type, id)
        }
        tokio_rusqlite::Error::ConnectionClosed | tokio_rusqlite::Error::Close(_) => {
            RepositoryError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::ffi;

    fn constraint_error(extended_code: std::os::raw::c_int) -> tokio_rusqlite::Error {
        let sqlite_err = ffi::Error {
            code: rusqlite::ErrorCode::ConstraintViolation,
            extended_code,
        };
        tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(sqlite_err, None))
    }

    #[test]
    fn test_primary_key_maps_to_already_exists() {
        let result = map_call_error(
            constraint_error(ffi::SQLITE_CONSTRAINT_PRIMARYKEY),
            "ChecklistItem",
            Some(12),
        );

        assert_eq!(
            result,
            RepositoryError::AlreadyExists {
                entity_type: "ChecklistItem",
                id: "12".to_string(),
            }
        );
    }

    #[test]
    fn test_foreign_key_maps_to_invalid_data() {
        let result = map_call_error(
            constraint_error(ffi::SQLITE_CONSTRAINT_FOREIGNKEY),
            "ChecklistItem",
            None,
        );

        assert!(matches!(result, RepositoryError::InvalidData(_)));
    }

    #[test]
    fn test_no_rows_maps_to_not_found_with_id() {
        let err = tokio_rusqlite::Error::Rusqlite(rusqlite::Error::QueryReturnedNoRows);

        let result = map_call_error(err, "Checklist", Some(5));

        assert_eq!(result, RepositoryError::checklist_not_found(5));
    }

    #[test]
    fn test_no_rows_without_id() {
        let err = tokio_rusqlite::Error::Rusqlite(rusqlite::Error::QueryReturnedNoRows);

        match map_call_error(err, "Checklist", None) {
            RepositoryError::NotFound { id, .. } => assert_eq!(id, "unknown"),
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_conversion_failure_maps_to_serialization() {
        let err = tokio_rusqlite::Error::Rusqlite(rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::other("unknown section tag")),
        ));

        let result = map_call_error(err, "ChecklistItem", None);

        assert!(matches!(result, RepositoryError::Serialization(_)));
    }

    #[test]
    fn test_connection_closed_maps_to_connection_failed() {
        let result = map_call_error(tokio_rusqlite::Error::ConnectionClosed, "Checklist", None);

        assert!(matches!(result, RepositoryError::ConnectionFailed(_)));
    }

    #[test]
    fn test_other_error_maps_to_query_failed() {
        let err = tokio_rusqlite::Error::Other(Box::new(std::io::Error::other("test error")));

        let result = map_call_error(err, "Checklist", None);

        assert!(matches!(result, RepositoryError::QueryFailed(_)));
    }
}
