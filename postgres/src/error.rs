use flightdeck_core::RepositoryError;

/// `foreign_key_violation`
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

/// Map a sqlx error to a [`RepositoryError`], prefixing `context`.
pub(crate) fn storage(context: &str, error: &sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db) = error {
        if matches!(
            db.code().as_deref(),
            Some(FOREIGN_KEY_VIOLATION | UNIQUE_VIOLATION)
        ) {
            return RepositoryError::Conflict(format!("{context}: {db}"));
        }
    }

    RepositoryError::Database(format!("{context}: {error}"))
}
