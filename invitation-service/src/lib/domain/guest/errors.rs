use thiserror::Error;

use crate::domain::errors::InfrastructureError;
use crate::domain::user::errors::EmailError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GuestIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GuestNameError {
    #[error("Guest name is empty")]
    Empty,

    #[error("Guest name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PhoneNumberError {
    #[error("Invalid phone number: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AttendanceStatusError {
    #[error("Unknown attendance status: {0}")]
    Unknown(String),
}

/// Error for optional details attached to a response
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResponseDetailsError {
    #[error("Too many additional guests: maximum {max}, got {actual}")]
    TooManyAdditionalGuests { max: u32, actual: u32 },

    #[error("Notes too long: maximum {max} characters, got {actual}")]
    NotesTooLong { max: usize, actual: usize },
}

/// Top-level error for guest persistence
#[derive(Debug, Clone, Error)]
pub enum GuestError {
    #[error("Invalid guest ID: {0}")]
    InvalidGuestId(#[from] GuestIdError),

    #[error("Invalid guest name: {0}")]
    InvalidName(#[from] GuestNameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid phone: {0}")]
    InvalidPhone(#[from] PhoneNumberError),

    #[error("Invalid status: {0}")]
    InvalidStatus(#[from] AttendanceStatusError),

    #[error("Invalid response details: {0}")]
    InvalidDetails(#[from] ResponseDetailsError),

    #[error("Guest not found: {0}")]
    NotFound(String),

    #[error("Invitation token already issued")]
    TokenCollision,

    #[error("Could not mint a unique invitation token after {attempts} attempts")]
    TokenSpaceExhausted { attempts: usize },

    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Error for resolving an invitation token.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Invitation not found")]
    NotFound,

    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl TokenError {
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::NotFound => "TOKEN_NOT_FOUND",
            TokenError::Infrastructure(_) => InfrastructureError::KIND,
            TokenError::Unknown(_) => "INTERNAL",
        }
    }
}

impl From<GuestError> for TokenError {
    fn from(err: GuestError) -> Self {
        match err {
            GuestError::Infrastructure(e) => TokenError::Infrastructure(e),
            other => TokenError::Unknown(other.to_string()),
        }
    }
}

/// Error reported by an invitation notifier.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    #[error("Invitation delivery failed: {0}")]
    Delivery(String),
}
