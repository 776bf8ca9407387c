use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::sign_up::SignUpResponseData;
use super::ApiError;
use super::ApiSuccess;
use super::FieldErrors;
use crate::domain::authentication::models::LoginCommand;
use crate::domain::authentication::ports::AuthenticationServicePort;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::inbound::http::extract::ApiJson;
use crate::inbound::http::router::AppState;

/// Exchange email and password for a fresh access token.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<ApiSuccess<SignUpResponseData>, ApiError> {
    state
        .authentication_service
        .login(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref authenticated| ApiSuccess::new(StatusCode::OK, authenticated.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    email: String,
    password: String,
}

impl LoginRequest {
    fn try_into_command(self) -> Result<LoginCommand, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = errors.check("email", EmailAddress::new(self.email));
        let password = errors.check("password", Password::new(self.password));

        match (email, password) {
            (Some(email), Some(password)) => Ok(LoginCommand { email, password }),
            _ => Err(errors),
        }
    }
}
