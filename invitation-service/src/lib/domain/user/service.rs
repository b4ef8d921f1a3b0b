use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::Password;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::CredentialStore;
use crate::domain::user::ports::UserServicePort;

/// Argon2id hash of a throwaway secret, checked when the username is unknown
/// so that a miss costs the same as a wrong secret.
const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$8YcpvdUpe31rwkOdcRvCMg$K+pqsxn87n7L1k/P07KqRDIWSDEpVo417nvSnTFDvy4";

/// Domain service implementation for credential operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<CS>
where
    CS: CredentialStore,
{
    store: Arc<CS>,
    authenticator: auth::Authenticator,
}

impl<CS> UserService<CS>
where
    CS: CredentialStore,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    ///
    /// # Returns
    /// Configured user service instance
    pub fn new(store: Arc<CS>) -> Self {
        Self {
            store,
            authenticator: auth::Authenticator::new(),
        }
    }

    fn hash(&self, secret: &Password) -> Result<String, UserError> {
        self.authenticator
            .hash_password(secret.expose())
            .map_err(|e| UserError::Hashing(e.to_string()))
    }

    /// Burn one Argon2 verification for a username that has no account.
    fn reject_unknown(&self, secret: &str) -> UserError {
        let _ = self.authenticator.verify_password(secret, DUMMY_PASSWORD_HASH);
        UserError::InvalidCredentials
    }
}

#[async_trait]
impl<CS> UserServicePort for UserService<CS>
where
    CS: CredentialStore,
{
    async fn register(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let password_hash = self.hash(&command.password)?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            full_name: command.full_name,
            password_hash,
            role: Role::Owner,
            created_at: Utc::now(),
        };

        let created = self.store.create(user).await?;
        tracing::info!(user_id = %created.id, username = %created.username, "Registered user");

        Ok(created)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn verify_credentials(&self, username: &str, secret: &str) -> Result<User, UserError> {
        let Ok(username) = Username::new(username.to_string()) else {
            return Err(self.reject_unknown(secret));
        };

        let Some(user) = self.store.find_by_username(&username).await? else {
            return Err(self.reject_unknown(secret));
        };

        match self.authenticator.verify_password(secret, &user.password_hash) {
            Ok(()) => Ok(user),
            Err(auth::AuthenticationError::InvalidCredentials) => Err(UserError::InvalidCredentials),
            Err(e) => Err(UserError::Hashing(e.to_string())),
        }
    }

    async fn rotate_secret(&self, id: &UserId, new_secret: Password) -> Result<(), UserError> {
        let password_hash = self.hash(&new_secret)?;
        self.store.update_password_hash(id, password_hash).await?;
        tracing::info!(user_id = %id, "Rotated user secret");
        Ok(())
    }
}
