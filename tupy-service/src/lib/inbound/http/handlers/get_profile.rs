use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::domain::user::models::User;
use crate::inbound::http::middleware::RequestUser;

/// Profile of the user behind the bearer token.
pub async fn get_profile(
    Extension(RequestUser(user)): Extension<RequestUser>,
) -> ApiSuccess<ProfileResponseData> {
    ApiSuccess::new(StatusCode::OK, (&user).into())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileResponseData {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for ProfileResponseData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            email: user.email.as_str().to_string(),
            first_name: user.first_name.as_str().to_string(),
            last_name: user.last_name.as_str().to_string(),
        }
    }
}
