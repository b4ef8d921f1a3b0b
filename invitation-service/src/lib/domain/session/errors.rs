use thiserror::Error;

use crate::domain::errors::InfrastructureError;
use crate::domain::user::errors::UserError;

/// Errors raised while establishing or checking a session.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Session has expired")]
    Expired,

    #[error("Session token is not recognized")]
    InvalidToken,

    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    #[error("Internal authentication failure: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::Expired => "EXPIRED",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::Infrastructure(_) => InfrastructureError::KIND,
            AuthError::Internal(_) => "INTERNAL",
        }
    }
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidCredentials => AuthError::InvalidCredentials,
            // A session whose owner vanished cannot be honored.
            UserError::NotFound(_) => AuthError::InvalidToken,
            UserError::Infrastructure(e) => AuthError::Infrastructure(e),
            other => AuthError::Internal(other.to_string()),
        }
    }
}
