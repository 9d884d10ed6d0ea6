//! In-memory repositories for exercising the service without a database.
//!
//! Uniqueness is enforced under one lock, the way the unique index does it in
//! Postgres, so concurrent registrations race exactly as they do in production.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::SubsecRound;
use chrono::Utc;

use crate::domain::user::models::TokenWithMetadata;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserLogin;
use crate::domain::user::models::UserRegister;
use crate::user::errors::UserError;
use crate::user::ports::TokenRepository;
use crate::user::ports::UserRepository;

struct StoredUser {
    user: User,
    password_hash: String,
    deleted_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<Vec<StoredUser>>,
}

impl InMemoryUserRepository {
    /// Number of non-deleted users.
    pub fn len(&self) -> usize {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.deleted_at.is_none())
            .count()
    }

    pub fn soft_delete(&self, id: &UserId) {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|row| row.user.id == *id) {
            row.deleted_at = Some(Utc::now());
        }
    }

    fn find_one<P>(&self, predicate: P, what: String) -> Result<User, UserError>
    where
        P: Fn(&StoredUser) -> bool,
    {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .filter(|row| row.deleted_at.is_none() && predicate(row))
            .max_by_key(|row| row.user.created_at)
            .map(|row| row.user.clone())
            .ok_or(UserError::NotFound(what))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn login_user(&self, login: &UserLogin) -> Result<User, UserError> {
        let rows = self.rows.lock().unwrap();
        let mut matches = rows.iter().filter(|row| {
            row.deleted_at.is_none()
                && row.user.username.as_str() == login.username
                && row.password_hash == login.password_hash
        });

        match (matches.next(), matches.next()) {
            (Some(row), None) => Ok(row.user.clone()),
            _ => Err(UserError::NotFound(
                "no user matches the supplied credentials".to_string(),
            )),
        }
    }

    async fn create_user(&self, user: UserRegister) -> Result<User, UserError> {
        let username = user.validate()?;

        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|row| row.deleted_at.is_none() && row.user.username == username)
        {
            return Err(UserError::UsernameAlreadyExists(user.username));
        }

        let created = User {
            id: user.id,
            username,
            profile: user.profile,
            created_at: Utc::now().trunc_subsecs(3),
        };
        rows.push(StoredUser {
            user: created.clone(),
            password_hash: user.password_hash,
            deleted_at: None,
        });

        Ok(created)
    }

    async fn get_user_by_id(&self, id: &UserId) -> Result<User, UserError> {
        self.find_one(|row| row.user.id == *id, format!("user {id}"))
    }

    async fn search_user(&self, first_name: &str, last_name: &str) -> Result<User, UserError> {
        self.find_one(
            |row| {
                row.user.profile.first_name.as_deref() == Some(first_name)
                    && row.user.profile.second_name.as_deref() == Some(last_name)
            },
            format!("user named {first_name} {last_name}"),
        )
    }
}

#[derive(Default)]
pub struct InMemoryTokenRepository {
    records: Mutex<Vec<TokenWithMetadata>>,
}

impl InMemoryTokenRepository {
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn records(&self) -> Vec<TokenWithMetadata> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn create_token(
        &self,
        token: TokenWithMetadata,
    ) -> Result<TokenWithMetadata, UserError> {
        self.records.lock().unwrap().push(token.clone());
        Ok(token)
    }
}
