use async_trait::async_trait;
use sqlx::PgConnection;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::Transaction;

use super::order;
use super::order::PostgresOrderRepository;
use super::user;
use super::user::PostgresUserRepository;
use crate::domain::errors::RepositoryError;
use crate::domain::order::models::NewOrder;
use crate::domain::ports::UnitOfWork;
use crate::domain::ports::UnitOfWorkFactory;
use crate::domain::user::models::NewUser;

/// Connection pool wrapper that opens one [`PostgresUnitOfWork`] per
/// logical operation.
#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trip a trivial query to prove the database answers.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl UnitOfWorkFactory for PostgresDatabase {
    type UnitOfWork = PostgresUnitOfWork;

    async fn begin(&self) -> Result<PostgresUnitOfWork, RepositoryError> {
        PostgresUnitOfWork::begin(self.pool.clone()).await
    }
}

/// Row staged with `flush = false`, written on the next flush.
#[derive(Debug)]
pub(crate) enum PendingWrite {
    User(NewUser),
    Order(NewOrder),
}

/// Transaction-scoped session.
///
/// Reads flush pending writes first, so every statement runs in issue order.
/// After a commit the next statement opens a fresh transaction on demand.
/// Dropping the value rolls back whatever is still open and hands the
/// connection back to the pool.
pub struct PostgresUnitOfWork {
    pool: PgPool,
    transaction: Option<Transaction<'static, Postgres>>,
    pending: Vec<PendingWrite>,
}

impl PostgresUnitOfWork {
    pub async fn begin(pool: PgPool) -> Result<Self, RepositoryError> {
        let transaction = pool.begin().await?;

        Ok(Self {
            pool,
            transaction: Some(transaction),
            pending: Vec::new(),
        })
    }

    /// Connection of the open transaction, beginning one if needed.
    async fn connection(&mut self) -> Result<&mut PgConnection, RepositoryError> {
        let transaction = match self.transaction.take() {
            Some(transaction) => transaction,
            None => self.pool.begin().await?,
        };

        Ok(&mut **self.transaction.insert(transaction))
    }

    /// Flush pending writes, then hand out the connection.
    pub(crate) async fn session(&mut self) -> Result<&mut PgConnection, RepositoryError> {
        self.flush().await?;
        self.connection().await
    }

    pub(crate) fn stage(&mut self, write: PendingWrite) {
        self.pending.push(write);
    }

    /// Write staged rows inside the open transaction without committing.
    ///
    /// # Errors
    /// * `UniqueViolation` - A staged row collides with an existing one
    pub async fn flush(&mut self) -> Result<(), RepositoryError> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let pending = std::mem::take(&mut self.pending);
        let count = pending.len();
        let connection = self.connection().await?;

        for write in pending {
            match write {
                PendingWrite::User(new_user) => {
                    user::insert(&mut *connection, &new_user).await?;
                }
                PendingWrite::Order(new_order) => {
                    order::insert(&mut *connection, &new_order).await?;
                }
            }
        }

        tracing::debug!(count, "Flushed pending writes");
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    type Users<'a> = PostgresUserRepository<'a>
    where
        Self: 'a;

    type Orders<'a> = PostgresOrderRepository<'a>
    where
        Self: 'a;

    fn users(&mut self) -> PostgresUserRepository<'_> {
        PostgresUserRepository::new(self)
    }

    fn orders(&mut self) -> PostgresOrderRepository<'_> {
        PostgresOrderRepository::new(self)
    }

    async fn commit(&mut self) -> Result<(), RepositoryError> {
        self.flush().await?;

        if let Some(transaction) = self.transaction.take() {
            transaction.commit().await?;
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), RepositoryError> {
        self.pending.clear();

        if let Some(transaction) = self.transaction.take() {
            transaction.rollback().await?;
        }
        Ok(())
    }
}

impl Drop for PostgresUnitOfWork {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            tracing::warn!(
                count = self.pending.len(),
                "Unit of work dropped with unflushed writes; discarding them"
            );
        }
    }
}
