use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::RepositoryError;
use crate::domain::order::errors::OrderError;
use crate::domain::order::models::NewOrder;
use crate::domain::order::models::Order;
use crate::domain::order::models::OrderFilter;
use crate::domain::order::models::OrderId;
use crate::domain::order::ports::OrderRepository;
use crate::domain::order::ports::OrderServicePort;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;
use crate::domain::ports::UnitOfWork;
use crate::domain::ports::UnitOfWorkFactory;

/// Domain service implementation for order operations.
pub struct OrderService<F>
where
    F: UnitOfWorkFactory,
{
    database: Arc<F>,
}

impl<F> OrderService<F>
where
    F: UnitOfWorkFactory,
{
    pub fn new(database: Arc<F>) -> Self {
        Self { database }
    }
}

#[async_trait]
impl<F> OrderServicePort for OrderService<F>
where
    F: UnitOfWorkFactory,
{
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrderError> {
        let mut unit_of_work = self.database.begin().await?;

        let mut order = unit_of_work
            .orders()
            .create(order, true)
            .await?
            .flushed()
            .ok_or_else(|| RepositoryError::RowNotFound("new order".to_string()))?;

        unit_of_work.commit().await?;
        unit_of_work.refresh(&mut order).await?;

        tracing::info!(order_id = %order.id, "Order created");

        Ok(order)
    }

    async fn get_order(&self, id: &OrderId) -> Result<Order, OrderError> {
        let mut unit_of_work = self.database.begin().await?;

        let order = unit_of_work.orders().get_by_id(*id).await?;

        order.ok_or(OrderError::NotFound(id.to_string()))
    }

    async fn list_orders(&self, request: PageRequest) -> Result<Page<Order>, OrderError> {
        let mut unit_of_work = self.database.begin().await?;

        let (orders, total) = unit_of_work.orders().get_all_paginated(request).await?;

        Ok(Page::new(orders, total, request))
    }

    async fn search_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, OrderError> {
        let mut unit_of_work = self.database.begin().await?;

        let orders = unit_of_work.orders().search(&filter).await?;
        tracing::debug!(matches = orders.len(), "Order search finished");

        Ok(orders)
    }
}
