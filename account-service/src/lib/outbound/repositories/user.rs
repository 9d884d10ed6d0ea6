use async_trait::async_trait;
use chrono::SubsecRound;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use super::errors::translate;
use super::errors::translate_with;
use crate::domain::user::models::Sex;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserLogin;
use crate::domain::user::models::UserProfile;
use crate::domain::user::models::UserRegister;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Name of the partial unique index on non-deleted usernames.
const USERNAME_CONSTRAINT: &str = "users_username_key";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &PgRow) -> Result<User, UserError> {
        let username: String = row.try_get("username").map_err(|e| translate(e, "user"))?;
        let sex: Option<String> = row.try_get("sex").map_err(|e| translate(e, "user"))?;

        Ok(User {
            id: UserId(row.try_get("id").map_err(|e| translate(e, "user"))?),
            username: Username::new(username).map_err(|e| {
                UserError::DatabaseError(format!("stored username is invalid: {e}"))
            })?,
            profile: UserProfile {
                first_name: row.try_get("first_name").map_err(|e| translate(e, "user"))?,
                second_name: row.try_get("second_name").map_err(|e| translate(e, "user"))?,
                sex: sex
                    .map(|s| s.parse::<Sex>())
                    .transpose()
                    .map_err(|e| UserError::DatabaseError(format!("stored sex is invalid: {e}")))?,
                birthdate: row.try_get("birthdate").map_err(|e| translate(e, "user"))?,
                biography: row.try_get("biography").map_err(|e| translate(e, "user"))?,
                city: row.try_get("city").map_err(|e| translate(e, "user"))?,
            },
            created_at: row.try_get("created_at").map_err(|e| translate(e, "user"))?,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn login_user(&self, login: &UserLogin) -> Result<User, UserError> {
        // Two rows are enough to tell a unique match from an ambiguous one.
        let rows = sqlx::query(
            r#"
            SELECT id, username, first_name, second_name, sex, birthdate, biography, city, created_at
            FROM users
            WHERE username = $1 AND password_hash = $2 AND deleted_at IS NULL
            LIMIT 2
            "#,
        )
        .bind(&login.username)
        .bind(&login.password_hash)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| translate(e, "user"))?;

        match rows.as_slice() {
            [row] => Self::row_to_user(row),
            _ => Err(UserError::NotFound(
                "no user matches the supplied credentials".to_string(),
            )),
        }
    }

    async fn create_user(&self, user: UserRegister) -> Result<User, UserError> {
        let username = user.validate()?;
        let created_at = Utc::now().trunc_subsecs(3);

        let row = sqlx::query(
            r#"
            INSERT INTO users (
                id, username, password_hash, first_name, second_name,
                sex, birthdate, biography, city, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, username, first_name, second_name, sex, birthdate, biography, city, created_at
            "#,
        )
        .bind(user.id.0)
        .bind(username.as_str())
        .bind(&user.password_hash)
        .bind(&user.profile.first_name)
        .bind(&user.profile.second_name)
        .bind(user.profile.sex.map(|sex| sex.as_str()))
        .bind(user.profile.birthdate)
        .bind(&user.profile.biography)
        .bind(&user.profile.city)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            translate_with(e, "user", |constraint| {
                if constraint == USERNAME_CONSTRAINT {
                    UserError::UsernameAlreadyExists(username.as_str().to_string())
                } else {
                    UserError::Conflict(format!("unique constraint {constraint} violated"))
                }
            })
        })?;

        Self::row_to_user(&row)
    }

    async fn get_user_by_id(&self, id: &UserId) -> Result<User, UserError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, first_name, second_name, sex, birthdate, biography, city, created_at
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| translate(e, &format!("user {id}")))?;

        Self::row_to_user(&row)
    }

    async fn search_user(&self, first_name: &str, last_name: &str) -> Result<User, UserError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, first_name, second_name, sex, birthdate, biography, city, created_at
            FROM users
            WHERE first_name = $1 AND second_name = $2 AND deleted_at IS NULL
            ORDER BY created_at DESC, id
            LIMIT 1
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| translate(e, &format!("user named {first_name} {last_name}")))?;

        Self::row_to_user(&row)
    }
}
