use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::session::errors::AuthError;
use crate::domain::session::models::IssuedSession;
use crate::domain::session::models::Session;
use crate::domain::user::models::Password;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Port for session authentication operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify credentials and open a new session.
    ///
    /// # Arguments
    /// * `username` - Raw username as submitted
    /// * `secret` - Plaintext secret as submitted
    ///
    /// # Returns
    /// The bearer token, the stored session and its user
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong secret
    /// * `Infrastructure` - Storage operation failed
    async fn login(&self, username: &str, secret: &str) -> Result<IssuedSession, AuthError>;

    /// Resolve a bearer token to its user. Does not extend the session.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is malformed or unknown
    /// * `Expired` - Session is past its expiry
    /// * `Infrastructure` - Storage operation failed
    async fn authenticate(&self, token: &str) -> Result<User, AuthError>;

    /// Invalidate the session behind a bearer token.
    ///
    /// Succeeds for tokens that are already gone.
    async fn logout(&self, token: &str) -> Result<(), AuthError>;

    /// Verify the current secret, store a new one and revoke every session
    /// of the user.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Current secret does not match
    /// * `Infrastructure` - Storage operation failed
    async fn change_password(
        &self,
        user: &User,
        current_secret: &str,
        new_secret: Password,
    ) -> Result<(), AuthError>;

    /// Remove sessions that are past their expiry.
    ///
    /// # Returns
    /// Number of sessions removed
    async fn purge_expired(&self) -> Result<u64, AuthError>;
}

/// Persistence operations for sessions.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    async fn create(&self, session: Session) -> Result<Session, AuthError>;

    async fn find_by_digest(&self, token_digest: &str) -> Result<Option<Session>, AuthError>;

    /// # Returns
    /// Whether a session was removed
    async fn delete_by_digest(&self, token_digest: &str) -> Result<bool, AuthError>;

    /// # Returns
    /// Number of sessions removed
    async fn delete_for_user(&self, user_id: &UserId) -> Result<u64, AuthError>;

    /// Remove every session with `expires_at <= now`.
    ///
    /// # Returns
    /// Number of sessions removed
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError>;
}
