use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Salted one-way hashing of user secrets (Argon2id, PHC string output).
///
/// Plaintext secrets are never stored or compared directly; only the PHC
/// string produced by [`PasswordHasher::hash`] is persisted.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext secret with a fresh random salt.
    ///
    /// # Arguments
    /// * `secret` - Plaintext secret
    ///
    /// # Returns
    /// PHC string (algorithm, parameters, salt and digest)
    ///
    /// # Errors
    /// * `EmptySecret` - Secret is the empty string
    /// * `HashingFailed` - Argon2 rejected the input
    pub fn hash(&self, secret: &str) -> Result<String, PasswordError> {
        if secret.is_empty() {
            return Err(PasswordError::EmptySecret);
        }

        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Check a plaintext secret against a stored PHC string.
    ///
    /// A mismatch is `Ok(false)`; only an unparseable stored hash is an error.
    ///
    /// # Errors
    /// * `MalformedHash` - Stored value is not a PHC string
    pub fn verify(&self, secret: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(stored_hash)
            .map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(secret.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
