use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::FieldErrors;
use super::UserData;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::UserRole;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::extract::ApiJson;
use crate::inbound::http::middleware::RequestUser;
use crate::inbound::http::router::AppState;

/// Create a user with an explicit role. Admins only.
pub async fn create_user(
    State(state): State<AppState>,
    Extension(current): Extension<RequestUser>,
    ApiJson(body): ApiJson<CreateUserRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    current.require_role(UserRole::Admin)?;

    state
        .user_service
        .create_user(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    email: String,
    first_name: String,
    last_name: String,
    password: String,
    #[serde(default)]
    role: UserRole,
}

impl CreateUserRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = errors.check("email", EmailAddress::new(self.email));
        let first_name = errors.check("first_name", PersonName::new(self.first_name));
        let last_name = errors.check("last_name", PersonName::new(self.last_name));
        let password = errors.check("password", Password::new(self.password));

        match (email, first_name, last_name, password) {
            (Some(email), Some(first_name), Some(last_name), Some(password)) => {
                Ok(CreateUserCommand {
                    email,
                    first_name,
                    last_name,
                    password,
                    role: self.role,
                })
            }
            _ => Err(errors),
        }
    }
}
