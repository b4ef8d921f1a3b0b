use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::retry::StorageError;
use super::retry::StoragePolicy;
use crate::domain::session::errors::AuthError;
use crate::domain::session::models::Session;
use crate::domain::session::ports::SessionStore;
use crate::domain::user::models::UserId;

pub struct PostgresSessionStore {
    pool: PgPool,
    policy: StoragePolicy,
}

impl PostgresSessionStore {
    pub fn new(pool: PgPool, policy: StoragePolicy) -> Self {
        Self { pool, policy }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    token_hash: String,
    user_id: Uuid,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            token_digest: row.token_hash,
            user_id: UserId(row.user_id),
            issued_at: row.issued_at,
            expires_at: row.expires_at,
        }
    }
}

fn storage_failure(err: StorageError) -> AuthError {
    match err {
        StorageError::Infrastructure(e) => AuthError::Infrastructure(e),
        // 256-bit tokens do not collide in practice.
        StorageError::UniqueViolation { constraint } => {
            AuthError::Internal(format!("unexpected unique violation on {}", constraint))
        }
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn create(&self, session: Session) -> Result<Session, AuthError> {
        let pool = &self.pool;
        let row = &session;

        self.policy
            .run("insert_session", move || async move {
                sqlx::query(
                    r#"
                    INSERT INTO sessions (token_hash, user_id, issued_at, expires_at)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (token_hash) DO NOTHING
                    "#,
                )
                .bind(row.token_digest.as_str())
                .bind(row.user_id.0)
                .bind(row.issued_at)
                .bind(row.expires_at)
                .execute(pool)
                .await
            })
            .await
            .map_err(storage_failure)?;

        Ok(session)
    }

    async fn find_by_digest(&self, token_digest: &str) -> Result<Option<Session>, AuthError> {
        let pool = &self.pool;

        let row = self
            .policy
            .run("find_session", move || async move {
                sqlx::query_as::<_, SessionRow>(
                    r#"
                    SELECT token_hash, user_id, issued_at, expires_at
                    FROM sessions
                    WHERE token_hash = $1
                    "#,
                )
                .bind(token_digest)
                .fetch_optional(pool)
                .await
            })
            .await
            .map_err(storage_failure)?;

        Ok(row.map(Session::from))
    }

    async fn delete_by_digest(&self, token_digest: &str) -> Result<bool, AuthError> {
        let pool = &self.pool;

        let result = self
            .policy
            .run("delete_session", move || async move {
                sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
                    .bind(token_digest)
                    .execute(pool)
                    .await
            })
            .await
            .map_err(storage_failure)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_for_user(&self, user_id: &UserId) -> Result<u64, AuthError> {
        let pool = &self.pool;
        let user_id = user_id.0;

        let result = self
            .policy
            .run("delete_user_sessions", move || async move {
                sqlx::query("DELETE FROM sessions WHERE user_id = $1")
                    .bind(user_id)
                    .execute(pool)
                    .await
            })
            .await
            .map_err(storage_failure)?;

        Ok(result.rows_affected())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError> {
        let pool = &self.pool;

        let result = self
            .policy
            .run("purge_expired_sessions", move || async move {
                sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
                    .bind(now)
                    .execute(pool)
                    .await
            })
            .await
            .map_err(storage_failure)?;

        Ok(result.rows_affected())
    }
}
