use async_trait::async_trait;

use crate::domain::errors::RepositoryError;
use crate::domain::order::errors::OrderError;
use crate::domain::order::models::NewOrder;
use crate::domain::order::models::Order;
use crate::domain::order::models::OrderFilter;
use crate::domain::order::models::OrderId;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;
use crate::domain::ports::Staged;

/// Port for order domain service operations.
#[async_trait]
pub trait OrderServicePort: Send + Sync + 'static {
    /// Store a new order and return it with its id and creation time.
    ///
    /// # Errors
    /// * `Repository` - Database operation failed
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrderError>;

    /// # Errors
    /// * `NotFound` - Order does not exist
    /// * `Repository` - Database operation failed
    async fn get_order(&self, id: &OrderId) -> Result<Order, OrderError>;

    async fn list_orders(&self, request: PageRequest) -> Result<Page<Order>, OrderError>;

    /// Orders within the filter's distance and duration bounds, ordered by id.
    async fn search_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, OrderError>;
}

/// Query and write operations for orders, bound to one unit of work.
#[async_trait]
pub trait OrderRepository: Send {
    async fn get_by_id(&mut self, id: OrderId) -> Result<Option<Order>, RepositoryError>;

    async fn get_all_paginated(
        &mut self,
        request: PageRequest,
    ) -> Result<(Vec<Order>, i64), RepositoryError>;

    /// Stage a new order; see [`UserRepository::create`] for `flush`.
    ///
    /// [`UserRepository::create`]: crate::domain::user::ports::UserRepository::create
    async fn create(&mut self, order: NewOrder, flush: bool)
        -> Result<Staged<Order>, RepositoryError>;

    async fn search(&mut self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError>;
}
