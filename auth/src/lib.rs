//! Authentication utilities library
//!
//! Provides the credential and token primitives the backend builds on:
//! - Password hashing (Argon2id)
//! - Signed, time-limited bearer tokens (JWT, HMAC family)
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("not_my_password", &hash));
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Claims};
//!
//! let auth = Authenticator::with_algorithm(b"secret_key_at_least_32_bytes_long!", "HS256").unwrap();
//!
//! // Sign up: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let claims = Claims::for_user(1, "bob@example.com", "Bob", "Feta", 60);
//! let result = auth.authenticate("password123", &hash, &claims).unwrap();
//!
//! // Later requests: verify the bearer token
//! let decoded = auth.verify_token(&result.access_token).unwrap();
//! assert_eq!(decoded.user_id, 1);
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
