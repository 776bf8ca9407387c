use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::OrderData;
use crate::domain::order::models::OrderId;
use crate::domain::order::ports::OrderServicePort;
use crate::inbound::http::extract::ApiPath;
use crate::inbound::http::router::AppState;

pub async fn get_order(
    State(state): State<AppState>,
    ApiPath(order_id): ApiPath<i64>,
) -> Result<ApiSuccess<OrderData>, ApiError> {
    state
        .order_service
        .get_order(&OrderId(order_id))
        .await
        .map_err(ApiError::from)
        .map(|ref order| ApiSuccess::new(StatusCode::OK, order.into()))
}
