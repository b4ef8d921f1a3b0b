use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Bearer token handed to a client after login.
///
/// Never persisted; `Debug` does not print it.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// Persisted session, keyed by the SHA-256 digest of its bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token_digest: String,
    pub user_id: UserId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(
        token_digest: String,
        user_id: UserId,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            token_digest,
            user_id,
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    /// A session is valid in `[issued_at, expires_at)`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: SessionToken,
    pub session: Session,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_expiry_window() {
        let issued_at = Utc::now();
        let session = Session::new(
            "digest".to_string(),
            UserId::new(),
            issued_at,
            Duration::hours(24),
        );

        assert!(!session.is_expired(issued_at));
        assert!(!session.is_expired(issued_at + Duration::hours(23)));
        assert!(session.is_expired(issued_at + Duration::hours(24)));
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = SessionToken::new("abc123".to_string());
        assert_eq!(format!("{:?}", token), "SessionToken(***)");
        assert_eq!(token.as_str(), "abc123");
    }
}
