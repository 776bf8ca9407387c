use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::FieldErrors;
use crate::domain::authentication::models::AuthenticatedUser;
use crate::domain::authentication::models::SignUpCommand;
use crate::domain::authentication::ports::AuthenticationServicePort;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::PersonName;
use crate::inbound::http::extract::ApiJson;
use crate::inbound::http::router::AppState;

pub async fn sign_up(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SignUpRequest>,
) -> Result<ApiSuccess<SignUpResponseData>, ApiError> {
    state
        .authentication_service
        .sign_up(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref authenticated| ApiSuccess::new(StatusCode::CREATED, authenticated.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignUpRequest {
    email: String,
    first_name: String,
    last_name: String,
    password: String,
}

impl SignUpRequest {
    fn try_into_command(self) -> Result<SignUpCommand, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = errors.check("email", EmailAddress::new(self.email));
        let first_name = errors.check("first_name", PersonName::new(self.first_name));
        let last_name = errors.check("last_name", PersonName::new(self.last_name));
        let password = errors.check("password", Password::new(self.password));

        match (email, first_name, last_name, password) {
            (Some(email), Some(first_name), Some(last_name), Some(password)) => Ok(SignUpCommand {
                email,
                first_name,
                last_name,
                password,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignUpResponseData {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub access_token: String,
}

impl From<&AuthenticatedUser> for SignUpResponseData {
    fn from(authenticated: &AuthenticatedUser) -> Self {
        let user = &authenticated.user;
        Self {
            id: user.id.0,
            email: user.email.as_str().to_string(),
            first_name: user.first_name.as_str().to_string(),
            last_name: user.last_name.as_str().to_string(),
            access_token: authenticated.access_token.clone(),
        }
    }
}
