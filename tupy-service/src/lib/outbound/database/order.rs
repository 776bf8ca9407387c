use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgConnection;

use super::unit_of_work::PendingWrite;
use super::unit_of_work::PostgresUnitOfWork;
use crate::domain::errors::RepositoryError;
use crate::domain::order::models::GeoPoint;
use crate::domain::order::models::NewOrder;
use crate::domain::order::models::Order;
use crate::domain::order::models::OrderFilter;
use crate::domain::order::models::OrderId;
use crate::domain::order::models::OrderName;
use crate::domain::order::ports::OrderRepository;
use crate::domain::pagination::PageRequest;
use crate::domain::ports::Staged;

const COLUMNS: &str = "id, name, description, start_latitude, start_longitude, \
                       end_latitude, end_longitude, distance_km, duration_minutes, created_at";

#[derive(Debug, FromRow)]
struct OrderRow {
    id: i64,
    name: Option<String>,
    description: Option<String>,
    start_latitude: f64,
    start_longitude: f64,
    end_latitude: f64,
    end_longitude: f64,
    distance_km: Option<f64>,
    duration_minutes: Option<f64>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let invalid = |e: &dyn std::fmt::Display| {
            RepositoryError::InvalidRow(format!("orders.id = {id}: {e}"))
        };

        Ok(Order {
            id: OrderId(id),
            name: row
                .name
                .map(OrderName::new)
                .transpose()
                .map_err(|e| invalid(&e))?,
            description: row.description,
            start_point: GeoPoint::new(row.start_latitude, row.start_longitude)
                .map_err(|e| invalid(&e))?,
            end_point: GeoPoint::new(row.end_latitude, row.end_longitude)
                .map_err(|e| invalid(&e))?,
            distance_km: row.distance_km,
            duration_minutes: row.duration_minutes,
            created_at: row.created_at,
        })
    }
}

pub(crate) async fn insert(
    connection: &mut PgConnection,
    order: &NewOrder,
) -> Result<Order, RepositoryError> {
    let query = format!(
        "INSERT INTO orders (name, description, start_latitude, start_longitude, \
         end_latitude, end_longitude, distance_km, duration_minutes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {COLUMNS}"
    );

    sqlx::query_as::<_, OrderRow>(&query)
        .bind(order.name.as_ref().map(OrderName::as_str))
        .bind(order.description.as_deref())
        .bind(order.start_point.latitude())
        .bind(order.start_point.longitude())
        .bind(order.end_point.latitude())
        .bind(order.end_point.longitude())
        .bind(order.distance_km)
        .bind(order.duration_minutes)
        .fetch_one(connection)
        .await?
        .try_into()
}

/// Order repository bound to one unit of work.
pub struct PostgresOrderRepository<'u> {
    unit_of_work: &'u mut PostgresUnitOfWork,
}

impl<'u> PostgresOrderRepository<'u> {
    pub fn new(unit_of_work: &'u mut PostgresUnitOfWork) -> Self {
        Self { unit_of_work }
    }
}

#[async_trait]
impl<'u> OrderRepository for PostgresOrderRepository<'u> {
    async fn get_by_id(&mut self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");

        sqlx::query_as::<_, OrderRow>(&query)
            .bind(id.0)
            .fetch_optional(self.unit_of_work.session().await?)
            .await?
            .map(Order::try_from)
            .transpose()
    }

    async fn get_all_paginated(
        &mut self,
        request: PageRequest,
    ) -> Result<(Vec<Order>, i64), RepositoryError> {
        let query = format!("SELECT {COLUMNS} FROM orders ORDER BY id LIMIT $1 OFFSET $2");
        let connection = self.unit_of_work.session().await?;

        let orders = sqlx::query_as::<_, OrderRow>(&query)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(&mut *connection)
            .await?
            .into_iter()
            .map(Order::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&mut *connection)
            .await?;

        Ok((orders, total))
    }

    async fn create(
        &mut self,
        order: NewOrder,
        flush: bool,
    ) -> Result<Staged<Order>, RepositoryError> {
        if !flush {
            self.unit_of_work.stage(PendingWrite::Order(order));
            return Ok(Staged::Pending);
        }

        let connection = self.unit_of_work.session().await?;
        let order = insert(connection, &order).await?;
        tracing::debug!(order_id = %order.id, "Inserted order");

        Ok(Staged::Flushed(order))
    }

    async fn search(&mut self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        // NULL bounds are open; NULL measures only match when both bounds are.
        let query = format!(
            "SELECT {COLUMNS} FROM orders \
             WHERE (($1::float8 IS NULL AND $2::float8 IS NULL) \
                    OR distance_km BETWEEN COALESCE($1, '-Infinity'::float8) \
                                       AND COALESCE($2, 'Infinity'::float8)) \
               AND (($3::float8 IS NULL AND $4::float8 IS NULL) \
                    OR duration_minutes BETWEEN COALESCE($3, '-Infinity'::float8) \
                                            AND COALESCE($4, 'Infinity'::float8)) \
             ORDER BY id"
        );

        sqlx::query_as::<_, OrderRow>(&query)
            .bind(filter.min_distance_km())
            .bind(filter.max_distance_km())
            .bind(filter.min_duration_minutes())
            .bind(filter.max_duration_minutes())
            .fetch_all(self.unit_of_work.session().await?)
            .await?
            .into_iter()
            .map(Order::try_from)
            .collect()
    }
}
