use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::TokenError;
use crate::token::TokenGenerator;

/// Authentication coordinator combining secret verification and opaque
/// session token issuance.
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_generator: TokenGenerator,
}

/// A freshly issued bearer token.
///
/// `token` is handed to the client exactly once; only `digest` is meant to
/// be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub digest: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),
}

impl Authenticator {
    pub fn new() -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_generator: TokenGenerator::new(),
        }
    }

    /// Hash a secret for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, secret: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(secret)
    }

    /// Check a secret against its stored hash.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Secret does not match
    /// * `PasswordError` - Stored hash could not be parsed
    pub fn verify_password(
        &self,
        secret: &str,
        stored_hash: &str,
    ) -> Result<(), AuthenticationError> {
        if self.password_hasher.verify(secret, stored_hash)? {
            Ok(())
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }

    /// Issue a bearer token without checking credentials.
    pub fn issue_token(&self) -> Result<IssuedToken, TokenError> {
        let token = self.token_generator.generate()?;
        let digest = self.token_generator.digest(&token);
        Ok(IssuedToken { token, digest })
    }

    /// Storage digest of a presented bearer token, or `None` when the token
    /// cannot have been issued by this authenticator.
    pub fn digest_token(&self, token: &str) -> Option<String> {
        self.token_generator
            .is_well_formed(token)
            .then(|| self.token_generator.digest(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_password_success() {
        let authenticator = Authenticator::new();
        let hash = authenticator.hash_password("my_password").unwrap();

        assert!(authenticator.verify_password("my_password", &hash).is_ok());

        let issued = authenticator.issue_token().unwrap();
        assert!(!issued.token.is_empty());
        assert_eq!(authenticator.digest_token(&issued.token), Some(issued.digest));
    }

    #[test]
    fn test_verify_password_invalid() {
        let authenticator = Authenticator::new();
        let hash = authenticator.hash_password("my_password").unwrap();

        let result = authenticator.verify_password("wrong_password", &hash);
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_password_malformed_hash() {
        let authenticator = Authenticator::new();

        let result = authenticator.verify_password("my_password", "not-a-phc-string");
        assert!(matches!(result, Err(AuthenticationError::PasswordError(_))));
    }

    #[test]
    fn test_issue_token_is_unique() {
        let authenticator = Authenticator::new();

        let first = authenticator.issue_token().unwrap();
        let second = authenticator.issue_token().unwrap();

        assert_ne!(first.token, second.token);
        assert_ne!(first.digest, second.digest);
        assert_ne!(first.token, first.digest);
    }

    #[test]
    fn test_digest_token_rejects_malformed() {
        let authenticator = Authenticator::new();
        assert_eq!(authenticator.digest_token("invalid.token.here"), None);
    }
}
