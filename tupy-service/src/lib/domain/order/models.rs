use std::fmt;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::errors::RepositoryError;
use crate::domain::order::errors::CoordinateError;
use crate::domain::order::errors::OrderFilterError;
use crate::domain::order::errors::OrderNameError;
use crate::domain::order::ports::OrderRepository;
use crate::domain::ports::Refreshable;
use crate::domain::ports::UnitOfWork;

/// Delivery order between two points.
///
/// Names are free text; two orders may share one.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub name: Option<OrderName>,
    pub description: Option<String>,
    pub start_point: GeoPoint,
    pub end_point: GeoPoint,
    pub distance_km: Option<f64>,
    pub duration_minutes: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
impl Refreshable for Order {
    fn describe(&self) -> String {
        format!("order {}", self.id)
    }

    async fn reload<U>(unit_of_work: &mut U, current: &Self) -> Result<Option<Self>, RepositoryError>
    where
        U: UnitOfWork,
    {
        unit_of_work.orders().get_by_id(current.id).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderId(pub i64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// # Errors
    /// * `LatitudeOutOfRange` - Latitude outside [-90, 90], infinite or NaN
    /// * `LongitudeOutOfRange` - Longitude outside [-180, 180], infinite or NaN
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderName(String);

impl OrderName {
    const MAX_LENGTH: usize = 255;

    pub fn new(name: String) -> Result<Self, OrderNameError> {
        let length = name.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(OrderNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Order to insert; id and `created_at` come from the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub name: Option<OrderName>,
    pub description: Option<String>,
    pub start_point: GeoPoint,
    pub end_point: GeoPoint,
    pub distance_km: Option<f64>,
    pub duration_minutes: Option<f64>,
}

/// Inclusive bounds on distance and duration. Absent bounds are open.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrderFilter {
    min_distance_km: Option<f64>,
    max_distance_km: Option<f64>,
    min_duration_minutes: Option<f64>,
    max_duration_minutes: Option<f64>,
}

impl OrderFilter {
    /// # Errors
    /// * `Negative` - A bound is below zero
    /// * `InvertedRange` - A minimum exceeds its maximum
    pub fn new(
        min_distance_km: Option<f64>,
        max_distance_km: Option<f64>,
        min_duration_minutes: Option<f64>,
        max_duration_minutes: Option<f64>,
    ) -> Result<Self, OrderFilterError> {
        check_range("distance_km", min_distance_km, max_distance_km)?;
        check_range("duration_minutes", min_duration_minutes, max_duration_minutes)?;

        Ok(Self {
            min_distance_km,
            max_distance_km,
            min_duration_minutes,
            max_duration_minutes,
        })
    }

    pub fn min_distance_km(&self) -> Option<f64> {
        self.min_distance_km
    }

    pub fn max_distance_km(&self) -> Option<f64> {
        self.max_distance_km
    }

    pub fn min_duration_minutes(&self) -> Option<f64> {
        self.min_duration_minutes
    }

    pub fn max_duration_minutes(&self) -> Option<f64> {
        self.max_duration_minutes
    }

    /// Whether an order satisfies every bound. Orders without a measured
    /// value only match when that measure is unbounded.
    pub fn matches(&self, order: &Order) -> bool {
        within(order.distance_km, self.min_distance_km, self.max_distance_km)
            && within(
                order.duration_minutes,
                self.min_duration_minutes,
                self.max_duration_minutes,
            )
    }
}

fn check_range(
    field: &'static str,
    min: Option<f64>,
    max: Option<f64>,
) -> Result<(), OrderFilterError> {
    for value in [min, max].into_iter().flatten() {
        if value < 0.0 {
            return Err(OrderFilterError::Negative { field, value });
        }
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(OrderFilterError::InvertedRange { field, min, max });
        }
    }
    Ok(())
}

fn within(value: Option<f64>, min: Option<f64>, max: Option<f64>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    match value {
        Some(value) => min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max),
        None => false,
    }
}
