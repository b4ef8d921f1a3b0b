use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Digest;
use sha2::Sha256;

use super::errors::TokenError;

/// Generator for opaque, unguessable bearer tokens.
///
/// Tokens are raw bytes from the operating system CSPRNG encoded as URL-safe
/// base64 without padding, so they can be placed in a path segment or an
/// `Authorization` header as-is. Tokens carry no structure and no embedded
/// expiry; their meaning lives entirely in whatever store maps them.
#[derive(Debug, Clone, Copy)]
pub struct TokenGenerator {
    byte_len: usize,
}

impl TokenGenerator {
    /// Default entropy: 256 bits.
    pub const DEFAULT_BYTE_LEN: usize = 32;

    pub fn new() -> Self {
        Self {
            byte_len: Self::DEFAULT_BYTE_LEN,
        }
    }

    /// Length in characters of every token this generator produces.
    pub fn encoded_len(&self) -> usize {
        (self.byte_len * 4).div_ceil(3)
    }

    /// Produce a fresh random token.
    ///
    /// # Errors
    /// * `RandomSourceUnavailable` - The OS random source failed
    pub fn generate(&self) -> Result<String, TokenError> {
        let mut bytes = vec![0u8; self.byte_len];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| TokenError::RandomSourceUnavailable(e.to_string()))?;

        Ok(URL_SAFE_NO_PAD.encode(&bytes))
    }

    /// Hex-encoded SHA-256 of a token, suitable for storage and lookup.
    pub fn digest(&self, token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }

    /// Cheap shape check performed before any store lookup.
    pub fn is_well_formed(&self, token: &str) -> bool {
        token.len() == self.encoded_len()
            && token
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_generate_is_url_safe_and_sized() {
        let generator = TokenGenerator::new();
        let token = generator.generate().unwrap();

        assert_eq!(token.len(), 43);
        assert_eq!(token.len(), generator.encoded_len());
        assert!(generator.is_well_formed(&token));
        assert!(!token.contains('='));
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
    }

    #[test]
    fn test_generate_does_not_repeat() {
        let generator = TokenGenerator::new();
        let tokens: HashSet<String> = (0..1_000).map(|_| generator.generate().unwrap()).collect();
        assert_eq!(tokens.len(), 1_000);
    }

    #[test]
    fn test_digest_is_stable_hex() {
        let generator = TokenGenerator::new();
        let digest = generator.digest("abc");

        assert_eq!(
            digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(digest, generator.digest("abc"));
    }

    #[test]
    fn test_is_well_formed_rejects_garbage() {
        let generator = TokenGenerator::new();

        assert!(!generator.is_well_formed(""));
        assert!(!generator.is_well_formed("short"));
        assert!(!generator.is_well_formed(&"a".repeat(42)));
        assert!(!generator.is_well_formed(&format!("{}!", "a".repeat(42))));
        assert!(generator.is_well_formed(&"a".repeat(43)));
    }
}
