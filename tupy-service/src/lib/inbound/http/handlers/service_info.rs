use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn service_info(State(state): State<AppState>) -> ApiSuccess<ServiceInfoResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        ServiceInfoResponseData {
            title: state.service.title.clone(),
            version: state.service.version.clone(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceInfoResponseData {
    pub title: String,
    pub version: String,
}
