use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Liveness probe that also proves the database answers.
pub async fn healthcheck(
    State(state): State<AppState>,
) -> Result<ApiSuccess<HealthcheckResponseData>, ApiError> {
    state
        .database
        .ping()
        .await
        .map_err(|e| ApiError::InternalServerError(e.to_string()))?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        HealthcheckResponseData {
            result: "success".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthcheckResponseData {
    pub result: String,
}
