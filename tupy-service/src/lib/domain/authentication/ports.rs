use async_trait::async_trait;

use crate::domain::authentication::errors::AuthenticationError;
use crate::domain::authentication::models::AuthenticatedUser;
use crate::domain::authentication::models::LoginCommand;
use crate::domain::authentication::models::SignUpCommand;
use crate::domain::user::models::User;

/// Port for sign-up, login and per-request identity resolution.
#[async_trait]
pub trait AuthenticationServicePort: Send + Sync + 'static {
    /// Register a user and issue an access token for it.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    async fn sign_up(&self, command: SignUpCommand) -> Result<AuthenticatedUser, AuthenticationError>;

    /// Check credentials and issue an access token.
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this email
    /// * `InvalidCredentials` - Password does not match
    async fn login(&self, command: LoginCommand) -> Result<AuthenticatedUser, AuthenticationError>;

    /// Resolve the user behind a raw `Authorization` header value.
    ///
    /// # Errors
    /// * `Unauthorized` - No bearer credential, a rejected token, or the
    ///   token's user is gone
    /// * `User` - The user lookup itself failed
    async fn resolve(&self, authorization: Option<&str>) -> Result<User, AuthenticationError>;
}
