pub mod books;
pub mod users;

use crate::domain::RepositoryError;

/// Maps a SQLite unique violation on `users.<column>` to a user-facing
/// conflict message; everything else is unexpected.
pub(crate) fn map_insert_error(err: sqlx::Error) -> RepositoryError {
    let sqlx::Error::Database(db_err) = &err else {
        return RepositoryError::unexpected(err.to_string());
    };

    if db_err.is_unique_violation() {
        let message = db_err.message();
        if message.contains("users.email") {
            return RepositoryError::conflict("Email already exists");
        }
        if message.contains("users.username") {
            return RepositoryError::conflict("Username already exists");
        }
        return RepositoryError::conflict("Record already exists");
    }
    if db_err.is_foreign_key_violation() {
        return RepositoryError::NotFound;
    }
    RepositoryError::unexpected(err.to_string())
}
