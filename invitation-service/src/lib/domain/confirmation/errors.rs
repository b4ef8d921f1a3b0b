use chrono::DateTime;
use chrono::Utc;
use thiserror::Error;

use crate::domain::errors::InfrastructureError;
use crate::domain::event::errors::EventError;
use crate::domain::guest::errors::GuestError;
use crate::domain::guest::errors::TokenError;
use crate::domain::guest::models::AttendanceStatus;

/// Errors raised while answering an invitation.
#[derive(Debug, Clone, Error)]
pub enum ConfirmationError {
    #[error("Invitation not found")]
    TokenNotFound,

    #[error("Responses for this event closed at {deadline}")]
    Closed { deadline: DateTime<Utc> },

    #[error("Invitation was already answered: {current}")]
    ConflictingState { current: AttendanceStatus },

    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ConfirmationError {
    pub fn kind(&self) -> &'static str {
        match self {
            ConfirmationError::TokenNotFound => "TOKEN_NOT_FOUND",
            ConfirmationError::Closed { .. } => "CLOSED",
            ConfirmationError::ConflictingState { .. } => "CONFLICTING_STATE",
            ConfirmationError::Infrastructure(_) => InfrastructureError::KIND,
            ConfirmationError::Unknown(_) => "INTERNAL",
        }
    }
}

impl From<TokenError> for ConfirmationError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::NotFound => ConfirmationError::TokenNotFound,
            TokenError::Infrastructure(e) => ConfirmationError::Infrastructure(e),
            TokenError::Unknown(msg) => ConfirmationError::Unknown(msg),
        }
    }
}

impl From<GuestError> for ConfirmationError {
    fn from(err: GuestError) -> Self {
        match err {
            GuestError::NotFound(_) => ConfirmationError::TokenNotFound,
            GuestError::Infrastructure(e) => ConfirmationError::Infrastructure(e),
            other => ConfirmationError::Unknown(other.to_string()),
        }
    }
}

impl From<EventError> for ConfirmationError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::NotFound(_) => ConfirmationError::TokenNotFound,
            EventError::Infrastructure(e) => ConfirmationError::Infrastructure(e),
            other => ConfirmationError::Unknown(other.to_string()),
        }
    }
}
