use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenGenerator;
use auth::TokenSubject;

use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Token;
use crate::domain::user::models::TokenId;
use crate::domain::user::models::TokenWithMetadata;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserLogin;
use crate::domain::user::models::UserRegister;
use crate::user::errors::ErrorContext;
use crate::user::errors::UserError;
use crate::user::ports::TokenRepository;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for account operations.
///
/// Holds no mutable state; concurrent calls only meet at the repositories.
pub struct UserService<UR, TR>
where
    UR: UserRepository,
    TR: TokenRepository,
{
    user_repository: Arc<UR>,
    token_repository: Arc<TR>,
    password_hasher: PasswordHasher,
    token_generator: Arc<TokenGenerator>,
}

impl<UR, TR> UserService<UR, TR>
where
    UR: UserRepository,
    TR: TokenRepository,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `user_repository` - User persistence implementation
    /// * `token_repository` - Token persistence implementation
    /// * `password_hasher` - Deterministic credential hasher
    /// * `token_generator` - Access token issuer
    pub fn new(
        user_repository: Arc<UR>,
        token_repository: Arc<TR>,
        password_hasher: PasswordHasher,
        token_generator: Arc<TokenGenerator>,
    ) -> Self {
        Self {
            user_repository,
            token_repository,
            password_hasher,
            token_generator,
        }
    }

    /// Sign a token for `user` and persist its record.
    async fn issue_token(&self, user: &User) -> Result<Token, UserError> {
        let token_id = TokenId::new();
        let user_id = user.id.to_string();
        let token_id_str = token_id.to_string();

        let issued = self
            .token_generator
            .generate_token(&TokenSubject {
                user_id: &user_id,
                username: user.username.as_str(),
                token_id: &token_id_str,
            })
            .context("generate token")?;

        let stored = self
            .token_repository
            .create_token(TokenWithMetadata {
                id: token_id,
                user_id: user.id,
                token: issued.token,
                created_at: issued.issued_at,
                expires_at: issued.expires_at,
            })
            .await
            .context("create token")?;

        tracing::debug!(
            user_id = %stored.user_id,
            token_id = %stored.id,
            expires_at = %stored.expires_at,
            "Token issued"
        );

        Ok(stored.into())
    }
}

#[async_trait]
impl<UR, TR> UserServicePort for UserService<UR, TR>
where
    UR: UserRepository,
    TR: TokenRepository,
{
    async fn login(&self, command: LoginCommand) -> Result<Token, UserError> {
        let password_hash = self
            .password_hasher
            .hash(&command.password)
            .context("hash password")?;

        let user = self
            .user_repository
            .login_user(&UserLogin {
                username: command.username,
                password_hash,
            })
            .await
            .context("login user")?;

        self.issue_token(&user).await
    }

    async fn register(&self, command: RegisterCommand) -> Result<Token, UserError> {
        if command.password.is_empty() {
            return Err(UserError::EmptyPassword.context("hash password"));
        }
        let password_hash = self
            .password_hasher
            .hash(&command.password)
            .context("hash password")?;

        let user = self
            .user_repository
            .create_user(UserRegister {
                id: UserId::new(),
                username: command.username,
                password_hash,
                profile: command.profile,
            })
            .await
            .context("create user")?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        // User creation and token issuance are separate statements.
        self.issue_token(&user).await.inspect_err(|e| {
            tracing::error!(
                user_id = %user.id,
                error = %e,
                "User registered but no token was issued"
            );
        })
    }

    async fn get_user_by_id(&self, id: &UserId) -> Result<User, UserError> {
        self.user_repository
            .get_user_by_id(id)
            .await
            .context("get user by id")
    }

    async fn search_user(&self, first_name: &str, last_name: &str) -> Result<User, UserError> {
        self.user_repository
            .search_user(first_name, last_name)
            .await
            .context("search user")
    }
}
