use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::authentication::ports::AuthenticationServicePort;
use crate::domain::user::models::User;
use crate::domain::user::models::UserRole;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension holding the user resolved from the bearer token.
#[derive(Debug, Clone)]
pub struct RequestUser(pub User);

impl RequestUser {
    /// # Errors
    /// * `Forbidden` - The user does not hold `role`
    pub fn require_role(&self, role: UserRole) -> Result<(), ApiError> {
        if self.0.role == role {
            Ok(())
        } else {
            tracing::debug!(user_id = %self.0.id, required = %role, "Role check failed");
            Err(ApiError::Forbidden)
        }
    }
}

/// Middleware that resolves the bearer token to a stored user and adds it
/// to request extensions. Any failure to do so is a 401.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let user = state
        .authentication_service
        .resolve(authorization.as_deref())
        .await?;

    req.extensions_mut().insert(RequestUser(user));

    Ok(next.run(req).await)
}
