use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::OrderData;
use crate::domain::order::errors::OrderError;
use crate::domain::order::models::OrderFilter;
use crate::domain::order::ports::OrderServicePort;
use crate::inbound::http::extract::ApiQuery;
use crate::inbound::http::router::AppState;

/// Orders whose distance and duration fall inside the given inclusive bounds.
pub async fn search_orders(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchOrdersParams>,
) -> Result<ApiSuccess<Vec<OrderData>>, ApiError> {
    let filter = OrderFilter::new(
        params.min_distance_km,
        params.max_distance_km,
        params.min_duration_minutes,
        params.max_duration_minutes,
    )
    .map_err(OrderError::from)?;

    state
        .order_service
        .search_orders(filter)
        .await
        .map_err(ApiError::from)
        .map(|orders| ApiSuccess::new(StatusCode::OK, orders.iter().map(OrderData::from).collect()))
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SearchOrdersParams {
    min_distance_km: Option<f64>,
    max_distance_km: Option<f64>,
    min_duration_minutes: Option<f64>,
    max_duration_minutes: Option<f64>,
}
