use async_trait::async_trait;

use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Token;
use crate::domain::user::models::TokenWithMetadata;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserLogin;
use crate::domain::user::models::UserRegister;
use crate::user::errors::UserError;

/// Port for account domain service operations.
///
/// Every error carries the name of the step that failed; callers branch on
/// [`UserError::kind`] only.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Authenticate by username and plaintext password and issue a token.
    ///
    /// # Errors
    /// * `NotFound` - No user matches both username and password
    /// * `Internal` - Hashing, signing, or storage failed
    async fn login(&self, command: LoginCommand) -> Result<Token, UserError>;

    /// Create an account and issue its first token.
    ///
    /// # Errors
    /// * `Validation` - Username, password, or profile is invalid
    /// * `Conflict` - Username is already taken
    /// * `Internal` - Hashing, signing, or storage failed
    async fn register(&self, command: RegisterCommand) -> Result<Token, UserError>;

    /// Retrieve a user by identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist or was deleted
    /// * `Internal` - Storage failed
    async fn get_user_by_id(&self, id: &UserId) -> Result<User, UserError>;

    /// Find a user by exact first and second name.
    ///
    /// # Errors
    /// * `NotFound` - No user has this name
    /// * `Internal` - Storage failed
    async fn search_user(&self, first_name: &str, last_name: &str) -> Result<User, UserError>;
}

/// Persistence operations for user accounts.
///
/// Soft-deleted rows are invisible to every operation.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Find the single user matching both username and password hash.
    ///
    /// # Errors
    /// * `NotFound` - Zero or several users match; the two cases are not distinguished
    /// * `DatabaseError` - Database operation failed
    async fn login_user(&self, login: &UserLogin) -> Result<User, UserError>;

    /// Validate and persist a new user.
    ///
    /// # Returns
    /// The persisted user, as read back from storage
    ///
    /// # Errors
    /// * `InvalidUsername` / `EmptyPassword` / `InvalidProfile` - Input rejected before storage
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create_user(&self, user: UserRegister) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_user_by_id(&self, id: &UserId) -> Result<User, UserError>;

    /// Retrieve the most recently created user with this exact name.
    ///
    /// # Errors
    /// * `NotFound` - No user has this name
    /// * `DatabaseError` - Database operation failed
    async fn search_user(&self, first_name: &str, last_name: &str) -> Result<User, UserError>;
}

/// Persistence operations for issued tokens.
#[async_trait]
pub trait TokenRepository: Send + Sync + 'static {
    /// Persist a token record as given.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create_token(&self, token: TokenWithMetadata)
        -> Result<TokenWithMetadata, UserError>;
}
