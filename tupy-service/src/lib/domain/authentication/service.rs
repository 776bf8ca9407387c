use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Claims;

use crate::domain::authentication::errors::AuthenticationError;
use crate::domain::authentication::models::AuthenticatedUser;
use crate::domain::authentication::models::LoginCommand;
use crate::domain::authentication::models::SignUpCommand;
use crate::domain::authentication::ports::AuthenticationServicePort;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserRole;
use crate::domain::user::ports::UserServicePort;

/// Authentication service built on top of the user service.
pub struct AuthenticationService<US>
where
    US: UserServicePort,
{
    user_service: Arc<US>,
    authenticator: Arc<Authenticator>,
    access_token_ttl_minutes: i64,
}

impl<US> AuthenticationService<US>
where
    US: UserServicePort,
{
    pub fn new(
        user_service: Arc<US>,
        authenticator: Arc<Authenticator>,
        access_token_ttl_minutes: i64,
    ) -> Self {
        Self {
            user_service,
            authenticator,
            access_token_ttl_minutes,
        }
    }

    fn claims_for(&self, user: &User) -> Claims {
        Claims::for_user(
            user.id.0,
            user.email.as_str(),
            user.first_name.as_str(),
            user.last_name.as_str(),
            self.access_token_ttl_minutes,
        )
    }

    fn issue_token(&self, user: &User) -> Result<String, AuthenticationError> {
        self.authenticator
            .issue_token(&self.claims_for(user))
            .map_err(|e| AuthenticationError::TokenIssuance(e.to_string()))
    }
}

/// Credentials of an `Authorization: Bearer <token>` header, scheme matched
/// case-insensitively.
fn bearer_token(authorization: &str) -> Option<&str> {
    let (scheme, credentials) = authorization.trim().split_once(' ')?;
    let credentials = credentials.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !credentials.is_empty() {
        Some(credentials)
    } else {
        None
    }
}

#[async_trait]
impl<US> AuthenticationServicePort for AuthenticationService<US>
where
    US: UserServicePort,
{
    async fn sign_up(
        &self,
        command: SignUpCommand,
    ) -> Result<AuthenticatedUser, AuthenticationError> {
        let user = self
            .user_service
            .create_user(CreateUserCommand {
                email: command.email,
                first_name: command.first_name,
                last_name: command.last_name,
                password: command.password,
                role: UserRole::default(),
            })
            .await
            .map_err(|e| match e {
                UserError::EmailAlreadyExists(email) => AuthenticationError::EmailAlreadyExists(email),
                other => AuthenticationError::User(other),
            })?;

        let access_token = self.issue_token(&user)?;

        Ok(AuthenticatedUser { user, access_token })
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthenticatedUser, AuthenticationError> {
        let user = self
            .user_service
            .get_user_by_email(&command.email)
            .await
            .map_err(|e| match e {
                UserError::NotFoundByEmail(email) => AuthenticationError::UserNotFound(email),
                other => AuthenticationError::User(other),
            })?;

        let authenticator = Arc::clone(&self.authenticator);
        let claims = self.claims_for(&user);
        let password_hash = user.password_hash.clone();
        let password = command.password;

        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(password.expose(), &password_hash, &claims)
        })
        .await
        .map_err(|e| AuthenticationError::TokenIssuance(e.to_string()))?;

        match result {
            Ok(authenticated) => {
                tracing::info!(user_id = %user.id, "User logged in");
                Ok(AuthenticatedUser {
                    user,
                    access_token: authenticated.access_token,
                })
            }
            Err(auth::AuthenticationError::InvalidCredentials) => {
                tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
                Err(AuthenticationError::InvalidCredentials)
            }
            Err(auth::AuthenticationError::JwtError(e)) => {
                Err(AuthenticationError::TokenIssuance(e.to_string()))
            }
        }
    }

    async fn resolve(&self, authorization: Option<&str>) -> Result<User, AuthenticationError> {
        let token = authorization
            .and_then(bearer_token)
            .ok_or(AuthenticationError::Unauthorized)?;

        let claims = self
            .authenticator
            .verify_token(token)
            .ok_or(AuthenticationError::Unauthorized)?;

        match self.user_service.get_user(&UserId(claims.user_id)).await {
            Ok(user) => Ok(user),
            Err(UserError::NotFound(_)) => {
                tracing::debug!(user_id = claims.user_id, "Token refers to a missing user");
                Err(AuthenticationError::Unauthorized)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::RepositoryError;
    use crate::domain::testing::user_fixture;
    use crate::domain::testing::MockUserService;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Password;
    use crate::domain::user::models::PersonName;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn service(user_service: MockUserService) -> AuthenticationService<MockUserService> {
        AuthenticationService::new(
            Arc::new(user_service),
            Arc::new(Authenticator::new(SECRET)),
            60,
        )
    }

    fn user_with_password(id: i64, email: &str, password: &str) -> User {
        let mut user = user_fixture(id, email);
        user.password_hash = auth::PasswordHasher::new().hash(password).unwrap();
        user
    }

    fn login(email: &str, password: &str) -> LoginCommand {
        LoginCommand {
            email: EmailAddress::new(email.to_string()).unwrap(),
            password: Password::new(password.to_string()).unwrap(),
        }
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("  BEARER   abc "), Some("abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("abc"), None);
    }

    #[tokio::test]
    async fn test_sign_up_uses_default_role_and_issues_token() {
        let mut user_service = MockUserService::new();
        user_service
            .expect_create_user()
            .withf(|command| command.role == UserRole::Admin)
            .times(1)
            .returning(|command| Ok(user_fixture(1, command.email.as_str())));

        let service = service(user_service);

        let authenticated = service
            .sign_up(SignUpCommand {
                email: EmailAddress::new("bob@example.com".to_string()).unwrap(),
                first_name: PersonName::new("Bob".to_string()).unwrap(),
                last_name: PersonName::new("Feta".to_string()).unwrap(),
                password: Password::new("password".to_string()).unwrap(),
            })
            .await
            .expect("Sign-up should succeed");

        let claims = Authenticator::new(SECRET)
            .verify_token(&authenticated.access_token)
            .expect("Issued token should verify");
        assert_eq!(claims.user_id, 1);
        assert_eq!(claims.email, "bob@example.com");
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email() {
        let mut user_service = MockUserService::new();
        user_service
            .expect_create_user()
            .returning(|command| Err(UserError::EmailAlreadyExists(command.email.to_string())));

        let result = service(user_service)
            .sign_up(SignUpCommand {
                email: EmailAddress::new("bob@example.com".to_string()).unwrap(),
                first_name: PersonName::new("Bob".to_string()).unwrap(),
                last_name: PersonName::new("Feta".to_string()).unwrap(),
                password: Password::new("password".to_string()).unwrap(),
            })
            .await;

        assert!(matches!(result, Err(AuthenticationError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut user_service = MockUserService::new();
        user_service
            .expect_get_user_by_email()
            .returning(|email| Ok(user_with_password(3, email.as_str(), "password")));

        let authenticated = service(user_service)
            .login(login("bob@example.com", "password"))
            .await
            .expect("Login should succeed");

        assert_eq!(authenticated.user.id, UserId(3));
        assert!(!authenticated.access_token.is_empty());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut user_service = MockUserService::new();
        user_service
            .expect_get_user_by_email()
            .returning(|email| Ok(user_with_password(3, email.as_str(), "password")));

        let result = service(user_service)
            .login(login("bob@example.com", "wrong-password"))
            .await;

        assert!(matches!(result, Err(AuthenticationError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut user_service = MockUserService::new();
        user_service
            .expect_get_user_by_email()
            .returning(|email| Err(UserError::NotFoundByEmail(email.to_string())));

        let result = service(user_service)
            .login(login("ghost@example.com", "password"))
            .await;

        assert!(matches!(result, Err(AuthenticationError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_resolve_valid_token() {
        let mut user_service = MockUserService::new();
        user_service
            .expect_get_user()
            .withf(|id| *id == UserId(5))
            .returning(|id| Ok(user_fixture(id.0, "bob@example.com")));

        let service = service(user_service);
        let token = service.issue_token(&user_fixture(5, "bob@example.com")).unwrap();
        let header = format!("Bearer {token}");

        let user = service.resolve(Some(&header)).await.unwrap();
        assert_eq!(user.id, UserId(5));
    }

    #[tokio::test]
    async fn test_resolve_rejects_missing_and_malformed_tokens() {
        let mut user_service = MockUserService::new();
        user_service.expect_get_user().times(0);
        let service = service(user_service);

        for header in [None, Some("Bearer"), Some("Token abc"), Some("Bearer not.a.jwt")] {
            let result = service.resolve(header).await;
            assert!(
                matches!(result, Err(AuthenticationError::Unauthorized)),
                "header {header:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_resolve_rejects_expired_token() {
        let mut user_service = MockUserService::new();
        user_service.expect_get_user().times(0);
        let service = service(user_service);

        let claims = Claims::for_user(5, "bob@example.com", "Bob", "Feta", 0);
        let token = Authenticator::new(SECRET).issue_token(&claims).unwrap();

        let result = service.resolve(Some(&format!("Bearer {token}"))).await;
        assert!(matches!(result, Err(AuthenticationError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_resolve_rejects_token_of_deleted_user() {
        let mut user_service = MockUserService::new();
        user_service
            .expect_get_user()
            .returning(|id| Err(UserError::NotFound(id.to_string())));

        let service = service(user_service);
        let token = service.issue_token(&user_fixture(5, "bob@example.com")).unwrap();

        let result = service.resolve(Some(&format!("Bearer {token}"))).await;
        assert!(matches!(result, Err(AuthenticationError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_resolve_propagates_database_failures() {
        let mut user_service = MockUserService::new();
        user_service.expect_get_user().returning(|_| {
            Err(UserError::Repository(RepositoryError::Database(
                "pool timed out".to_string(),
            )))
        });

        let service = service(user_service);
        let token = service.issue_token(&user_fixture(5, "bob@example.com")).unwrap();

        let result = service.resolve(Some(&format!("Bearer {token}"))).await;
        assert!(matches!(result, Err(AuthenticationError::User(_))));
    }
}
