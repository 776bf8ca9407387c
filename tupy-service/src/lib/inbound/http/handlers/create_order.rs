use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::FieldErrors;
use super::OrderData;
use super::PointData;
use crate::domain::order::models::GeoPoint;
use crate::domain::order::models::NewOrder;
use crate::domain::order::models::OrderName;
use crate::domain::order::ports::OrderServicePort;
use crate::inbound::http::extract::ApiJson;
use crate::inbound::http::router::AppState;

pub async fn create_order(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateOrderRequest>,
) -> Result<ApiSuccess<OrderData>, ApiError> {
    state
        .order_service
        .create_order(body.try_into_new_order()?)
        .await
        .map_err(ApiError::from)
        .map(|ref order| ApiSuccess::new(StatusCode::CREATED, order.into()))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateOrderRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    start_point: PointData,
    end_point: PointData,
    #[serde(default)]
    distance_km: Option<f64>,
    #[serde(default)]
    duration_minutes: Option<f64>,
}

impl CreateOrderRequest {
    fn try_into_new_order(self) -> Result<NewOrder, FieldErrors> {
        let mut errors = FieldErrors::default();
        let name = errors.check("name", self.name.map(OrderName::new).transpose());
        let start_point = errors.check(
            "start_point",
            GeoPoint::new(self.start_point.lat, self.start_point.lng),
        );
        let end_point = errors.check(
            "end_point",
            GeoPoint::new(self.end_point.lat, self.end_point.lng),
        );

        match (name, start_point, end_point) {
            (Some(name), Some(start_point), Some(end_point)) => Ok(NewOrder {
                name,
                description: self.description,
                start_point,
                end_point,
                distance_km: self.distance_km,
                duration_minutes: self.duration_minutes,
            }),
            _ => Err(errors),
        }
    }
}
