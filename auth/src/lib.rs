//! Authentication utilities library
//!
//! Provides the credential primitives used by the invitation service:
//! - Secret hashing (Argon2id)
//! - Opaque bearer token generation and storage digests
//! - Authentication coordination
//!
//! The service defines its own ports and adapts these implementations; this
//! crate holds no state and performs no I/O.
//!
//! # Examples
//!
//! ## Secret Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Opaque Tokens
//! ```
//! use auth::TokenGenerator;
//!
//! let generator = TokenGenerator::new();
//! let token = generator.generate().unwrap();
//! assert!(generator.is_well_formed(&token));
//! let stored = generator.digest(&token);
//! assert_eq!(stored.len(), 64);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//!
//! let auth = Authenticator::new();
//!
//! // Register: hash secret
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify the secret, then issue a bearer token
//! auth.verify_password("password123", &hash).unwrap();
//! let issued = auth.issue_token().unwrap();
//!
//! // Later requests: map the presented token back to its stored digest
//! assert_eq!(auth.digest_token(&issued.token), Some(issued.digest));
//! ```

pub mod authenticator;
pub mod password;
pub mod token;

pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::IssuedToken;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::TokenError;
pub use token::TokenGenerator;
