use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token handling.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
}

/// Result of successful authentication.
#[derive(Debug)]
pub struct AuthenticationResult {
    /// Signed bearer token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create an authenticator signing with HS256.
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
        }
    }

    /// Create an authenticator for a configured algorithm name.
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - See [`JwtHandler::with_algorithm`]
    pub fn with_algorithm(jwt_secret: &[u8], algorithm: &str) -> Result<Self, JwtError> {
        Ok(Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::with_algorithm(jwt_secret, algorithm)?,
        })
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a password against a stored hash without issuing anything.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and issue a token for `claims`.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match (or the hash is unreadable)
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        claims: &Claims,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.jwt_handler.encode(claims)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Issue a token without password verification (e.g. right after sign-up).
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(&self, claims: &Claims) -> Result<String, JwtError> {
        self.jwt_handler.encode(claims)
    }

    /// Verify a token and return its claims.
    ///
    /// Expired, tampered, wrongly signed and malformed tokens all yield `None`;
    /// callers cannot tell these cases apart.
    pub fn verify_token(&self, token: &str) -> Option<Claims> {
        let claims: Claims = match self.jwt_handler.decode(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Rejected access token");
                return None;
            }
        };

        if claims.is_expired(Utc::now().timestamp()) {
            tracing::debug!(user_id = claims.user_id, "Rejected expired access token");
            return None;
        }

        Some(claims)
    }
}
