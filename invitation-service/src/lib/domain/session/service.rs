use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use chrono::Utc;

use crate::domain::session::errors::AuthError;
use crate::domain::session::models::IssuedSession;
use crate::domain::session::models::Session;
use crate::domain::session::models::SessionToken;
use crate::domain::session::ports::AuthServicePort;
use crate::domain::session::ports::SessionStore;
use crate::domain::user::models::Password;
use crate::domain::user::models::User;
use crate::domain::user::ports::UserServicePort;

/// Session authentication over a credential service and a session store.
pub struct AuthService<US, SS>
where
    US: UserServicePort,
    SS: SessionStore,
{
    user_service: Arc<US>,
    sessions: Arc<SS>,
    authenticator: auth::Authenticator,
    session_ttl: Duration,
}

impl<US, SS> AuthService<US, SS>
where
    US: UserServicePort,
    SS: SessionStore,
{
    /// Create a new auth service.
    ///
    /// # Arguments
    /// * `user_service` - Credential verification
    /// * `sessions` - Session persistence implementation
    /// * `session_ttl` - Lifetime of a newly issued session
    pub fn new(user_service: Arc<US>, sessions: Arc<SS>, session_ttl: Duration) -> Self {
        Self {
            user_service,
            sessions,
            authenticator: auth::Authenticator::new(),
            session_ttl,
        }
    }
}

#[async_trait]
impl<US, SS> AuthServicePort for AuthService<US, SS>
where
    US: UserServicePort,
    SS: SessionStore,
{
    async fn login(&self, username: &str, secret: &str) -> Result<IssuedSession, AuthError> {
        let user = match self.user_service.verify_credentials(username, secret).await {
            Ok(user) => user,
            Err(e) => {
                let err = AuthError::from(e);
                if matches!(err, AuthError::InvalidCredentials) {
                    tracing::warn!(username = %username, "Rejected login attempt");
                }
                return Err(err);
            }
        };

        let issued = self
            .authenticator
            .issue_token()
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let session = Session::new(issued.digest, user.id, Utc::now(), self.session_ttl);
        let session = self.sessions.create(session).await?;

        tracing::info!(user_id = %user.id, expires_at = %session.expires_at, "Opened session");

        Ok(IssuedSession {
            token: SessionToken::new(issued.token),
            session,
            user,
        })
    }

    async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let digest = self
            .authenticator
            .digest_token(token)
            .ok_or(AuthError::InvalidToken)?;

        let session = self
            .sessions
            .find_by_digest(&digest)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if session.is_expired(Utc::now()) {
            return Err(AuthError::Expired);
        }

        Ok(self.user_service.get_user(&session.user_id).await?)
    }

    async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let Some(digest) = self.authenticator.digest_token(token) else {
            return Ok(());
        };

        if self.sessions.delete_by_digest(&digest).await? {
            tracing::info!("Closed session");
        }
        Ok(())
    }

    async fn change_password(
        &self,
        user: &User,
        current_secret: &str,
        new_secret: Password,
    ) -> Result<(), AuthError> {
        self.user_service
            .verify_credentials(user.username.as_str(), current_secret)
            .await?;

        self.user_service.rotate_secret(&user.id, new_secret).await?;

        // The new secret is already stored here; a failed revocation leaves
        // old sessions alive until the caller retries or they expire.
        let revoked = self
            .sessions
            .delete_for_user(&user.id)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    user_id = %user.id,
                    error = %e,
                    "Secret rotated but session revocation failed"
                );
            })?;
        tracing::info!(user_id = %user.id, revoked, "Revoked sessions after secret rotation");

        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, AuthError> {
        self.sessions.delete_expired(Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use mockall::mock;

    use super::*;
    use crate::domain::errors::InfrastructureError;
    use crate::domain::user::errors::UserError;
    use crate::domain::user::models::CreateUserCommand;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::FullName;
    use crate::domain::user::models::Role;
    use crate::domain::user::models::UserId;
    use crate::domain::user::models::Username;

    mock! {
        pub TestUserService {}

        #[async_trait]
        impl UserServicePort for TestUserService {
            async fn register(&self, command: CreateUserCommand) -> Result<User, UserError>;
            async fn get_user(&self, id: &UserId) -> Result<User, UserError>;
            async fn verify_credentials(&self, username: &str, secret: &str) -> Result<User, UserError>;
            async fn rotate_secret(&self, id: &UserId, new_secret: Password) -> Result<(), UserError>;
        }
    }

    mock! {
        pub TestSessionStore {}

        #[async_trait]
        impl SessionStore for TestSessionStore {
            async fn create(&self, session: Session) -> Result<Session, AuthError>;
            async fn find_by_digest(&self, token_digest: &str) -> Result<Option<Session>, AuthError>;
            async fn delete_by_digest(&self, token_digest: &str) -> Result<bool, AuthError>;
            async fn delete_for_user(&self, user_id: &UserId) -> Result<u64, AuthError>;
            async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError>;
        }
    }

    fn owner() -> User {
        User {
            id: UserId::new(),
            username: Username::new("alice".to_string()).unwrap(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            full_name: FullName::new("Alice".to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            role: Role::Owner,
            created_at: Utc::now(),
        }
    }

    fn service(
        users: MockTestUserService,
        sessions: MockTestSessionStore,
    ) -> AuthService<MockTestUserService, MockTestSessionStore> {
        AuthService::new(Arc::new(users), Arc::new(sessions), Duration::hours(24))
    }

    #[tokio::test]
    async fn test_login_issues_token_and_stores_digest() {
        let mut users = MockTestUserService::new();
        let mut sessions = MockTestSessionStore::new();
        let user = owner();
        let returned = user.clone();

        users
            .expect_verify_credentials()
            .withf(|username, secret| username == "alice" && secret == "s3cret-pass")
            .times(1)
            .returning(move |_, _| Ok(returned.clone()));

        sessions
            .expect_create()
            .withf(move |session| {
                session.user_id == user.id
                    && session.token_digest.len() == 64
                    && session.expires_at - session.issued_at == Duration::hours(24)
            })
            .times(1)
            .returning(|session| Ok(session));

        let issued = service(users, sessions)
            .login("alice", "s3cret-pass")
            .await
            .unwrap();

        assert_eq!(issued.token.as_str().len(), 43);
        assert_ne!(issued.token.as_str(), issued.session.token_digest);
    }

    #[tokio::test]
    async fn test_login_invalid_credentials() {
        let mut users = MockTestUserService::new();
        let mut sessions = MockTestSessionStore::new();

        users
            .expect_verify_credentials()
            .times(1)
            .returning(|_, _| Err(UserError::InvalidCredentials));
        sessions.expect_create().times(0);

        let result = service(users, sessions).login("alice", "nope").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_authenticate_round_trip() {
        let mut users = MockTestUserService::new();
        let mut sessions = MockTestSessionStore::new();
        let user = owner();
        let user_id = user.id;
        let verified = user.clone();

        let authenticator = auth::Authenticator::new();
        let issued = authenticator.issue_token().unwrap();
        let digest = issued.digest.clone();

        sessions
            .expect_find_by_digest()
            .withf(move |d| d == digest)
            .times(1)
            .returning(move |d| {
                Ok(Some(Session::new(
                    d.to_string(),
                    user_id,
                    Utc::now(),
                    Duration::hours(1),
                )))
            });
        users
            .expect_get_user()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(verified.clone()));

        let authenticated = service(users, sessions)
            .authenticate(&issued.token)
            .await
            .unwrap();
        assert_eq!(authenticated.id, user.id);
    }

    #[tokio::test]
    async fn test_authenticate_expired_session() {
        let users = MockTestUserService::new();
        let mut sessions = MockTestSessionStore::new();

        sessions.expect_find_by_digest().times(1).returning(|d| {
            Ok(Some(Session::new(
                d.to_string(),
                UserId::new(),
                Utc::now() - Duration::hours(25),
                Duration::hours(24),
            )))
        });

        let token = auth::Authenticator::new().issue_token().unwrap().token;
        let result = service(users, sessions).authenticate(&token).await;
        assert!(matches!(result, Err(AuthError::Expired)));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_token() {
        let users = MockTestUserService::new();
        let mut sessions = MockTestSessionStore::new();

        sessions
            .expect_find_by_digest()
            .times(1)
            .returning(|_| Ok(None));

        let token = auth::Authenticator::new().issue_token().unwrap().token;
        let result = service(users, sessions).authenticate(&token).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_authenticate_malformed_token_skips_store() {
        let users = MockTestUserService::new();
        let mut sessions = MockTestSessionStore::new();
        sessions.expect_find_by_digest().times(0);

        let result = service(users, sessions).authenticate("not a token").await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let users = MockTestUserService::new();
        let mut sessions = MockTestSessionStore::new();

        let mut seq = mockall::Sequence::new();
        sessions
            .expect_delete_by_digest()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        sessions
            .expect_delete_by_digest()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));

        let service = service(users, sessions);
        let token = auth::Authenticator::new().issue_token().unwrap().token;

        assert!(service.logout(&token).await.is_ok());
        assert!(service.logout(&token).await.is_ok());
        assert!(service.logout("garbage").await.is_ok());
    }

    #[tokio::test]
    async fn test_change_password_revokes_sessions() {
        let mut users = MockTestUserService::new();
        let mut sessions = MockTestSessionStore::new();
        let user = owner();
        let user_id = user.id;
        let verified = user.clone();

        users
            .expect_verify_credentials()
            .withf(|username, secret| username == "alice" && secret == "old-secret")
            .times(1)
            .returning(move |_, _| Ok(verified.clone()));
        users
            .expect_rotate_secret()
            .withf(move |id, secret| *id == user_id && secret.expose() == "new-secret-123")
            .times(1)
            .returning(|_, _| Ok(()));
        sessions
            .expect_delete_for_user()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(|_| Ok(2));

        let result = service(users, sessions)
            .change_password(
                &user,
                "old-secret",
                Password::new("new-secret-123".to_string()).unwrap(),
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_change_password_wrong_current_secret() {
        let mut users = MockTestUserService::new();
        let mut sessions = MockTestSessionStore::new();

        users
            .expect_verify_credentials()
            .times(1)
            .returning(|_, _| Err(UserError::InvalidCredentials));
        users.expect_rotate_secret().times(0);
        sessions.expect_delete_for_user().times(0);

        let result = service(users, sessions)
            .change_password(
                &owner(),
                "wrong",
                Password::new("new-secret-123".to_string()).unwrap(),
            )
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_change_password_reports_failed_revocation() {
        let mut users = MockTestUserService::new();
        let mut sessions = MockTestSessionStore::new();
        let user = owner();
        let verified = user.clone();

        users
            .expect_verify_credentials()
            .times(1)
            .returning(move |_, _| Ok(verified.clone()));
        users
            .expect_rotate_secret()
            .times(1)
            .returning(|_, _| Ok(()));
        sessions.expect_delete_for_user().times(1).returning(|_| {
            Err(AuthError::Infrastructure(InfrastructureError::Timeout {
                operation: "delete_sessions_for_user",
                timeout_ms: 100,
            }))
        });

        let result = service(users, sessions)
            .change_password(
                &user,
                "old-secret",
                Password::new("new-secret-123".to_string()).unwrap(),
            )
            .await;
        assert!(matches!(result, Err(AuthError::Infrastructure(_))));
    }
}
