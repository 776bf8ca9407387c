use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::OrderData;
use super::PageData;
use super::PaginationParams;
use crate::domain::order::ports::OrderServicePort;
use crate::inbound::http::extract::ApiQuery;
use crate::inbound::http::router::AppState;

pub async fn list_orders(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> Result<ApiSuccess<PageData<OrderData>>, ApiError> {
    state
        .order_service
        .list_orders(params.try_into_request()?)
        .await
        .map_err(ApiError::from)
        .map(|page| {
            ApiSuccess::new(
                StatusCode::OK,
                PageData::from_page(page, |order| (&order).into()),
            )
        })
}
