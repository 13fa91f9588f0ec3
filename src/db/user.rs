use uuid::Uuid;

use super::models::UserModel;
use super::Db;
use crate::error::{DbError, Result};

impl Db {
    /// Look up a user by username. No auto-creation.
    pub async fn query_user(&self, username: &str) -> Result<Option<UserModel>> {
        let user = sqlx::query_as::<_, UserModel>(
            "SELECT id, username, nickname FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get-or-create a user by username. The insert is optimistic: when the
    /// UNIQUE constraint fires (another caller got there first), the
    /// winning row is read back instead. No upfront lock.
    pub async fn ensure_user(&self, username: &str, nickname: &str) -> Result<UserModel> {
        let username = username.trim();
        if username.is_empty() {
            return Err(DbError::Validation("username must not be empty".to_owned()));
        }
        let nickname = match nickname.trim() {
            "" => username,
            trimmed => trimmed,
        };

        let inserted = sqlx::query_as::<_, UserModel>(
            r#"
            INSERT INTO users (id, username, nickname) VALUES ($1, $2, $3)
            ON CONFLICT(username) DO NOTHING
            RETURNING id, username, nickname
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(nickname)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(user) = inserted {
            tracing::info!("user created: id={}, username={username:?}", user.id);
            return Ok(user);
        }

        self.query_user(username)
            .await?
            .ok_or_else(|| DbError::UserNotFound(username.to_owned()))
    }
}
