use thiserror::Error;

use crate::domain::errors::InfrastructureError;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FullNameError {
    #[error("Full name is empty")]
    Empty,

    #[error("Full name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters")]
    TooShort { min: usize },

    #[error("Password too long: maximum {max} characters")]
    TooLong { max: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role: {0}")]
    Unknown(String),
}

/// Top-level error for credential store operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid full name: {0}")]
    InvalidFullName(#[from] FullNameError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordPolicyError),

    #[error("Invalid role: {0}")]
    InvalidRole(#[from] RoleError),

    // Domain-level errors
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Username already exists: {0}")]
    UsernameAlreadyExists(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    // Infrastructure errors
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl UserError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            UserError::InvalidUserId(_)
            | UserError::InvalidUsername(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidFullName(_)
            | UserError::InvalidPassword(_)
            | UserError::InvalidRole(_) => "VALIDATION",
            UserError::NotFound(_) => "NOT_FOUND",
            UserError::UsernameAlreadyExists(_) | UserError::EmailAlreadyExists(_) => {
                "ALREADY_EXISTS"
            }
            UserError::InvalidCredentials => "INVALID_CREDENTIALS",
            UserError::Infrastructure(_) => InfrastructureError::KIND,
            UserError::Hashing(_) | UserError::Unknown(_) => "INTERNAL",
        }
    }
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        UserError::Unknown(err.to_string())
    }
}
