//! Translation of driver failures into the account error taxonomy.
//!
//! Repositories never return a raw `sqlx::Error`; everything passes through
//! [`translate`] or [`translate_with`].

use crate::user::errors::UserError;

/// Translate a driver error, reporting unique violations as a generic conflict.
///
/// # Arguments
/// * `error` - Driver error
/// * `record` - Human description of the record that was looked up
pub fn translate(error: sqlx::Error, record: &str) -> UserError {
    translate_with(error, record, |constraint| {
        UserError::Conflict(format!("unique constraint {constraint} violated"))
    })
}

/// Translate a driver error, letting the caller name the conflict.
///
/// `on_unique_violation` receives the violated constraint name (empty when the
/// backend does not report one).
pub fn translate_with<C>(error: sqlx::Error, record: &str, on_unique_violation: C) -> UserError
where
    C: FnOnce(&str) -> UserError,
{
    tracing::debug!(error = %error, record, "Database operation failed");

    match error {
        sqlx::Error::RowNotFound => UserError::NotFound(record.to_string()),
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            on_unique_violation(db_err.constraint().unwrap_or_default())
        }
        sqlx::Error::Database(db_err) => UserError::DatabaseError(db_err.message().to_string()),
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => {
            UserError::DatabaseError(format!("connection failure: {error}"))
        }
        other => UserError::DatabaseError(other.to_string()),
    }
}
