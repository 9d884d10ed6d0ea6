use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::Row;

use super::errors::translate;
use crate::domain::user::models::TokenId;
use crate::domain::user::models::TokenWithMetadata;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::TokenRepository;
use crate::user::errors::UserError;

pub struct PostgresTokenRepository {
    pool: PgPool,
}

impl PostgresTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for PostgresTokenRepository {
    async fn create_token(
        &self,
        token: TokenWithMetadata,
    ) -> Result<TokenWithMetadata, UserError> {
        let row = sqlx::query(
            r#"
            INSERT INTO tokens (id, user_id, token, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, token, created_at, expires_at
            "#,
        )
        .bind(token.id.0)
        .bind(token.user_id.0)
        .bind(&token.token)
        .bind(token.created_at)
        .bind(token.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| translate(e, "token"))?;

        Ok(TokenWithMetadata {
            id: TokenId(row.try_get("id").map_err(|e| translate(e, "token"))?),
            user_id: UserId(row.try_get("user_id").map_err(|e| translate(e, "token"))?),
            token: row.try_get("token").map_err(|e| translate(e, "token"))?,
            created_at: row.try_get("created_at").map_err(|e| translate(e, "token"))?,
            expires_at: row.try_get("expires_at").map_err(|e| translate(e, "token"))?,
        })
    }
}
