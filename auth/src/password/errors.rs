use thiserror::Error;

/// Error type for secret hashing operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Secret must not be empty")]
    EmptySecret,

    #[error("Secret hashing failed: {0}")]
    HashingFailed(String),

    #[error("Stored hash is malformed: {0}")]
    MalformedHash(String),
}
