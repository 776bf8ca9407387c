use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::User;

/// A user together with a freshly issued access token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub access_token: String,
}

/// Self-service registration. The role is always the default one.
#[derive(Debug, Clone)]
pub struct SignUpCommand {
    pub email: EmailAddress,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub password: Password,
}

#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: Password,
}
