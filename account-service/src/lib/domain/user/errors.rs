use auth::JwtError;
use auth::PasswordError;
use chrono::NaiveDate;
use thiserror::Error;

/// Classification every caller branches on.
///
/// The message text of an error is for humans only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller input failed checks before storage was touched
    Validation,
    /// No matching record
    NotFound,
    /// Uniqueness violation
    Conflict,
    /// Hashing, signing, or backend failure
    Internal,
}

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Error for profile field validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("{field} too long: maximum {max} characters, got {actual}")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("Unknown sex: {0} (expected male or female)")]
    UnknownSex(String),

    #[error("Birthdate {0} is in the future")]
    BirthdateInFuture(NaiveDate),
}

/// Top-level error for all account operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid profile: {0}")]
    InvalidProfile(#[from] ProfileError),

    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Username already exists: {0}")]
    UsernameAlreadyExists(String),

    #[error("Record already exists: {0}")]
    Conflict(String),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("{operation}: {source}")]
    Context {
        operation: &'static str,
        #[source]
        source: Box<UserError>,
    },
}

impl UserError {
    /// Kind of the innermost error; wrapping never changes it.
    pub fn kind(&self) -> ErrorKind {
        match self {
            UserError::InvalidUserId(_)
            | UserError::InvalidUsername(_)
            | UserError::InvalidProfile(_)
            | UserError::EmptyPassword => ErrorKind::Validation,
            UserError::NotFound(_) => ErrorKind::NotFound,
            UserError::UsernameAlreadyExists(_) | UserError::Conflict(_) => ErrorKind::Conflict,
            UserError::Password(_) | UserError::Token(_) | UserError::DatabaseError(_) => {
                ErrorKind::Internal
            }
            UserError::Context { source, .. } => source.kind(),
        }
    }

    /// Wrap with the name of the operation that failed.
    pub fn context(self, operation: &'static str) -> Self {
        UserError::Context {
            operation,
            source: Box::new(self),
        }
    }

    /// Innermost error, with every layer of context stripped.
    pub fn root(&self) -> &UserError {
        match self {
            UserError::Context { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Attach operation context to any error convertible into [`UserError`].
pub trait ErrorContext<T> {
    fn context(self, operation: &'static str) -> Result<T, UserError>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: Into<UserError>,
{
    fn context(self, operation: &'static str) -> Result<T, UserError> {
        self.map_err(|e| {
            let error: UserError = e.into();
            error.context(operation)
        })
    }
}
