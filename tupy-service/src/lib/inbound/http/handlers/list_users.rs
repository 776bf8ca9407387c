use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::PageData;
use super::PaginationParams;
use super::UserData;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::extract::ApiQuery;
use crate::inbound::http::router::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> Result<ApiSuccess<PageData<UserData>>, ApiError> {
    state
        .user_service
        .list_users(params.try_into_request()?)
        .await
        .map_err(ApiError::from)
        .map(|page| ApiSuccess::new(StatusCode::OK, PageData::from_page(page, |user| (&user).into())))
}
