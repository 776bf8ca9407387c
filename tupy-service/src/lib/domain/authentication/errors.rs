use thiserror::Error;

use crate::domain::user::errors::UserError;

#[derive(Debug, Clone, Error)]
pub enum AuthenticationError {
    #[error("User with such email already exists.")]
    EmailAlreadyExists(String),

    #[error("Unable to find user with provided email.")]
    UserNotFound(String),

    #[error("Unable to login with provided credentials.")]
    InvalidCredentials,

    /// Missing, malformed, expired or tampered token, or a token whose user
    /// no longer exists. Deliberately carries no detail.
    #[error("Unauthorized.")]
    Unauthorized,

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    #[error(transparent)]
    User(#[from] UserError),
}
