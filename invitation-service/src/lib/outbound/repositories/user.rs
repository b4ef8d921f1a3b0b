use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::retry::StorageError;
use super::retry::StoragePolicy;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::FullName;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::CredentialStore;

pub struct PostgresCredentialStore {
    pool: PgPool,
    policy: StoragePolicy,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool, policy: StoragePolicy) -> Self {
        Self { pool, policy }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    full_name: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            username: Username::new(row.username)?,
            email: EmailAddress::new(row.email)?,
            full_name: FullName::new(row.full_name)?,
            password_hash: row.password_hash,
            role: row.role.parse()?,
            created_at: row.created_at,
        })
    }
}

fn storage_failure(err: StorageError) -> UserError {
    match err {
        StorageError::Infrastructure(e) => UserError::Infrastructure(e),
        StorageError::UniqueViolation { constraint } => {
            UserError::Unknown(format!("unexpected unique violation on {}", constraint))
        }
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let pool = &self.pool;
        let row = &user;

        self.policy
            .run("insert_user", move || async move {
                sqlx::query(
                    r#"
                    INSERT INTO users (id, username, email, full_name, password_hash, role, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    ON CONFLICT (id) DO NOTHING
                    "#,
                )
                .bind(row.id.0)
                .bind(row.username.as_str())
                .bind(row.email.as_str())
                .bind(row.full_name.as_str())
                .bind(row.password_hash.as_str())
                .bind(row.role.as_str())
                .bind(row.created_at)
                .execute(pool)
                .await
            })
            .await
            .map_err(|e| match e {
                StorageError::UniqueViolation { ref constraint }
                    if constraint == "users_username_key" =>
                {
                    UserError::UsernameAlreadyExists(user.username.as_str().to_string())
                }
                StorageError::UniqueViolation { ref constraint }
                    if constraint == "users_email_key" =>
                {
                    UserError::EmailAlreadyExists(user.email.as_str().to_string())
                }
                other => storage_failure(other),
            })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let pool = &self.pool;
        let id = id.0;

        let row = self
            .policy
            .run("find_user_by_id", move || async move {
                sqlx::query_as::<_, UserRow>(
                    r#"
                    SELECT id, username, email, full_name, password_hash, role, created_at
                    FROM users
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .fetch_optional(pool)
                .await
            })
            .await
            .map_err(storage_failure)?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let pool = &self.pool;
        let username = username.as_str();

        let row = self
            .policy
            .run("find_user_by_username", move || async move {
                sqlx::query_as::<_, UserRow>(
                    r#"
                    SELECT id, username, email, full_name, password_hash, role, created_at
                    FROM users
                    WHERE username = $1
                    "#,
                )
                .bind(username)
                .fetch_optional(pool)
                .await
            })
            .await
            .map_err(storage_failure)?;

        row.map(User::try_from).transpose()
    }

    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: String,
    ) -> Result<(), UserError> {
        let pool = &self.pool;
        let user_id = id.0;
        let password_hash = password_hash.as_str();

        let result = self
            .policy
            .run("update_user_password", move || async move {
                sqlx::query(
                    r#"
                    UPDATE users
                    SET password_hash = $2
                    WHERE id = $1
                    "#,
                )
                .bind(user_id)
                .bind(password_hash)
                .execute(pool)
                .await
            })
            .await
            .map_err(storage_failure)?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
