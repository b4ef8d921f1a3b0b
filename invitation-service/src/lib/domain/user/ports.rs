use async_trait::async_trait;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::Password;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;

/// Port for credential domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new event owner.
    ///
    /// # Arguments
    /// * `command` - Validated command containing username, email, full name and secret
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Infrastructure` - Storage operation failed
    async fn register(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Infrastructure` - Storage operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Check a username and secret pair.
    ///
    /// An unknown username and a wrong secret produce the same error.
    ///
    /// # Arguments
    /// * `username` - Raw username as submitted
    /// * `secret` - Plaintext secret as submitted
    ///
    /// # Returns
    /// The matching user entity
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong secret
    /// * `Infrastructure` - Storage operation failed
    async fn verify_credentials(&self, username: &str, secret: &str) -> Result<User, UserError>;

    /// Replace the stored secret of a user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Infrastructure` - Storage operation failed
    async fn rotate_secret(&self, id: &UserId, new_secret: Password) -> Result<(), UserError>;
}

/// Persistence operations for stored credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Infrastructure` - Storage operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by username.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Overwrite the stored password hash.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Infrastructure` - Storage operation failed
    async fn update_password_hash(&self, id: &UserId, password_hash: String)
        -> Result<(), UserError>;
}
